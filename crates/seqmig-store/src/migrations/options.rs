//! Run control
//!
//! A run can be stopped between migrations, never in the middle of one.
//! Aborting a statement already in flight is the database's business.

use seqmig_core::errors::{MigrationError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag
///
/// Clones observe the same flag, so a clone can be handed to another
/// thread (a signal handler, a supervisor) while the run holds the other.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stops before its next migration
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Options for a migration run
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    cancel: Option<CancelToken>,
    deadline: Option<Instant>,
}

impl MigrateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Stop before any migration that would start after `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the run must not start the migration named `next`
    pub(crate) fn check(&self, next: &str) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(MigrationError::Cancelled {
                next: next.to_string(),
            }
            .into());
        }

        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(MigrationError::DeadlineExceeded {
                next: next.to_string(),
            }
            .into());
        }

        Ok(())
    }
}
