//! Error handling for seqmig-store
//!
//! Wraps the seqmig-core ExError with store-specific helpers

use seqmig_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration application error for the named migration
pub fn migration_failed(name: &str, message: &str, source: ExError) -> ExError {
    ExError::new(ExErrorKind::MigrationFailed)
        .with_op("apply_migration")
        .with_migration(name)
        .with_message(message)
        .with_source(source)
}

/// Create an error for a ledger row that cannot be decoded
pub fn invalid_ledger_row(id: i64, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("read_ledger")
        .with_message(format!("Ledger row {} is malformed: {}", id, reason))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}
