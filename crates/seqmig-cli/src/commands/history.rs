//! History command
//!
//! Usage: seqmig history --db <PATH> [--json]

use super::DbArgs;
use clap::Args;
use seqmig_store::migrations::{applied_migrations, ledger_exists};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Print the ledger as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute history command
pub fn execute(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = args.db.open_existing()?;

    // A database that was never migrated has no ledger yet
    let rows = if ledger_exists(&conn)? {
        applied_migrations(&conn)?
    } else {
        Vec::new()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No migrations applied");
        return Ok(());
    }

    for row in rows {
        println!("{:>4}  {}  {}", row.id, row.applied_at.to_rfc3339(), row.name);
    }

    Ok(())
}
