//! Migration framework
//!
//! Provides:
//! - Ledger of applied migrations
//! - Sequential runner with per-migration transactional or direct apply
//! - Cooperative cancellation and deadlines between migrations

pub mod ledger;
mod options;
mod runner;

pub use ledger::{
    applied_migrations, ensure_ledger, last_applied, ledger_exists, record_applied, AppliedMigration,
    LEDGER_TABLE,
};
pub use options::{CancelToken, MigrateOptions};
pub use runner::{apply_migration, migrate, migrate_with, MigrationReport};
