pub mod history;
pub mod migrate;

use clap::Args;
use rusqlite::Connection;
use seqmig_store::db;
use std::path::PathBuf;

/// Database selection shared by every command
#[derive(Debug, Args)]
pub struct DbArgs {
    /// Path to the SQLite database file
    #[arg(long = "db", env = "SEQMIG_DATABASE")]
    pub path: PathBuf,
}

impl DbArgs {
    /// Open and configure the selected database, creating it if missing
    pub fn open(&self) -> seqmig_store::Result<Connection> {
        let conn = db::open(&self.path)?;
        db::configure(&conn, db::DEFAULT_BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Open the selected database for reading; it must already exist
    pub fn open_existing(&self) -> seqmig_store::Result<Connection> {
        let conn = db::open_existing(&self.path)?;
        conn.busy_timeout(db::DEFAULT_BUSY_TIMEOUT)
            .map_err(seqmig_store::errors::from_rusqlite)?;
        Ok(conn)
    }
}
