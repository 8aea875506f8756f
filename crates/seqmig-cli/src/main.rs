//! seqmig CLI
//!
//! Command-line interface for applying SQL migrations to a SQLite database

use clap::{Parser, Subcommand};
use seqmig_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "seqmig")]
#[command(about = "seqmig - Sequential SQL schema migrations", long_about = None)]
struct Cli {
    /// Log output format: dev (human readable) or json
    #[arg(long, global = true, env = "SEQMIG_LOG_FORMAT", default_value = "dev")]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply every pending migration from a directory
    Migrate(commands::migrate::MigrateArgs),
    /// List the migrations recorded in the ledger
    History(commands::history::HistoryArgs),
}

fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging_facility::init(cli.log_format);

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args),
        Commands::History(args) => commands::history::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
