//! seqmig store - SQLite persistence and the migration runner
//!
//! Provides:
//! - Connection helpers and the database capability traits the runner needs
//! - The migration ledger (applied-migration bookkeeping)
//! - The sequential migration runner

pub mod conn;
pub mod db;
pub mod errors;
pub mod migrations;

// Re-export key types
pub use errors::Result;
pub use migrations::{migrate, migrate_with, CancelToken, MigrateOptions, MigrationReport};
