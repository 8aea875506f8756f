//! Migrate command
//!
//! Usage: seqmig migrate --db <PATH> [--dir <DIR>] [--timeout-secs <N>] [--json]

use super::DbArgs;
use clap::Args;
use seqmig_core::plan::DirSource;
use seqmig_store::{migrate_with, MigrateOptions};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Directory containing the migration files
    #[arg(long, env = "SEQMIG_MIGRATIONS_DIR", default_value = "migrations")]
    pub dir: PathBuf,

    /// Do not start new migrations after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute migrate command
pub fn execute(args: MigrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = args.db.open()?;
    let source = DirSource::new(&args.dir);

    let mut options = MigrateOptions::new();
    if let Some(secs) = args.timeout_secs {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let report = migrate_with(&mut conn, &source, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_noop() {
        println!(
            "Database is up to date ({} migrations in {})",
            report.plan_len,
            args.dir.display()
        );
        return Ok(());
    }

    for name in &report.applied {
        println!("✓ Applied {}", name);
    }
    println!(
        "Applied {} of {} migrations in {} ms",
        report.applied.len(),
        report.plan_len,
        report.duration_ms
    );

    Ok(())
}
