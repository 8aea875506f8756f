//! seqmig core
//!
//! Provides:
//! - Structured error facility shared by every seqmig crate
//! - Logging facility (tracing based) with canonical operation macros
//! - Migration plan builder and migration sources

pub mod errors;
pub mod logging_facility;
pub mod plan;

// Re-export key types
pub use errors::{ExError, ExErrorKind, MigrationError, Result};
pub use plan::{
    build_plan, DirSource, EmbeddedSource, MigrationDefinition, MigrationPlan, MigrationSource,
    ResumePoint,
};
