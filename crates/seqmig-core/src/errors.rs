use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Plan building
    InvalidInput,
    InvalidMigrationName,
    NotFound,

    // Application
    MigrationFailed,

    // Run control
    Cancelled,
    Timeout,

    // Infrastructure
    Io,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidMigrationName => "ERR_INVALID_MIGRATION_NAME",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling, the migration
/// the failure belongs to, the wrapped cause, and (for composite errors)
/// every individual failure that was collected.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    migration: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    related: Vec<ExError>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            migration: None,
            message: String::new(),
            source: None,
            related: Vec::new(),
        }
    }

    /// Join a set of collected errors into one composite error.
    ///
    /// The individual errors are kept in collection order and are
    /// available through [`ExError::related`].
    pub fn aggregate(kind: ExErrorKind, errors: Vec<ExError>) -> Self {
        let message = match errors.len() {
            1 => "1 error".to_string(),
            n => format!("{} errors", n),
        };
        Self::new(kind).with_message(message).with_related(errors)
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration name context
    pub fn with_migration(mut self, name: impl Into<String>) -> Self {
        self.migration = Some(name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach collected errors
    pub fn with_related(mut self, errors: Vec<ExError>) -> Self {
        self.related = errors;
        self
    }

    /// Wrap this error in an outer error of the same kind.
    ///
    /// The outer error carries the given operation and message while this
    /// error becomes its source, so the kind stays stable as the error
    /// travels up through the runner.
    pub fn context(self, op: impl Into<String>, message: impl Into<String>) -> Self {
        let mut outer = ExError::new(self.kind).with_op(op).with_message(message);
        if let Some(name) = &self.migration {
            outer.migration = Some(name.clone());
        }
        outer.with_source(self)
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the migration name context, if any
    pub fn migration(&self) -> Option<&str> {
        self.migration.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the collected errors of a composite error
    pub fn related(&self) -> &[ExError] {
        &self.related
    }

    /// Walk the source chain down to the innermost error
    pub fn root_cause(&self) -> &ExError {
        let mut current = self;
        while let Some(next) = current.source.as_deref() {
            current = next;
        }
        current
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(migration) = &self.migration {
            write!(f, " (migration: {})", migration)?;
        }
        if !self.related.is_empty() {
            write!(f, " {{")?;
            for (i, err) in self.related.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}", err)?;
            }
            write!(f, "}}")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while reading and ordering migrations, and while
/// controlling a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrationError {
    /// The ordering prefix of a migration name is not an integer
    #[error("Invalid ordering prefix '{prefix}' in migration '{name}': {reason}")]
    InvalidPrefix {
        name: String,
        prefix: String,
        reason: String,
    },

    /// A source entry has a name that cannot be used as a migration name
    #[error("Invalid migration entry name '{name}': {reason}")]
    InvalidEntryName { name: String, reason: String },

    /// Listing the migration source failed
    #[error("Failed to list migration source '{location}': {reason}")]
    ListFailed { location: String, reason: String },

    /// Reading a migration's content failed
    #[error("Failed to read migration '{name}': {reason}")]
    ReadFailed { name: String, reason: String },

    /// The named entry does not exist in the source
    #[error("Migration '{name}' not found in source")]
    EntryNotFound { name: String },

    /// The caller cancelled the run
    #[error("Run cancelled before applying migration '{next}'")]
    Cancelled { next: String },

    /// The caller's deadline passed
    #[error("Deadline exceeded before applying migration '{next}'")]
    DeadlineExceeded { next: String },
}

/// Conversion from MigrationError to ExError
///
/// Maps each variant to its canonical kind and lifts the migration name
/// into the structured context.
impl From<MigrationError> for ExError {
    fn from(err: MigrationError) -> Self {
        let message = err.to_string();
        match &err {
            MigrationError::InvalidPrefix { name, .. }
            | MigrationError::InvalidEntryName { name, .. } => {
                ExError::new(ExErrorKind::InvalidMigrationName)
                    .with_op("parse_migration_name")
                    .with_migration(name.clone())
                    .with_message(message)
            }
            MigrationError::ListFailed { .. } => ExError::new(ExErrorKind::Io)
                .with_op("list_migrations")
                .with_message(message),
            MigrationError::ReadFailed { name, .. } => ExError::new(ExErrorKind::Io)
                .with_op("read_migration")
                .with_migration(name.clone())
                .with_message(message),
            MigrationError::EntryNotFound { name } => ExError::new(ExErrorKind::NotFound)
                .with_op("read_migration")
                .with_migration(name.clone())
                .with_message(message),
            MigrationError::Cancelled { next } => ExError::new(ExErrorKind::Cancelled)
                .with_op("migrate")
                .with_migration(next.clone())
                .with_message(message),
            MigrationError::DeadlineExceeded { next } => ExError::new(ExErrorKind::Timeout)
                .with_op("migrate")
                .with_migration(next.clone())
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExError::new(ExErrorKind::MigrationFailed)
            .with_op("apply_migration")
            .with_migration("002.sql")
            .with_message("executing migration");

        assert_eq!(
            err.to_string(),
            "[ERR_MIGRATION_FAILED] in operation 'apply_migration': executing migration (migration: 002.sql)"
        );
    }

    #[test]
    fn test_context_preserves_kind_and_migration() {
        let inner = ExError::new(ExErrorKind::Persistence)
            .with_op("sqlite")
            .with_migration("003.sql")
            .with_message("no such table: users");

        let outer = inner.context("migrate", "applying migration");

        assert_eq!(outer.kind(), ExErrorKind::Persistence);
        assert_eq!(outer.op(), Some("migrate"));
        assert_eq!(outer.migration(), Some("003.sql"));
        assert_eq!(outer.root_cause().message(), "no such table: users");
        assert!(outer.to_string().contains("no such table: users"));
    }

    #[test]
    fn test_aggregate_lists_every_error() {
        let errors = vec![
            ExError::new(ExErrorKind::InvalidMigrationName).with_migration("a.sql"),
            ExError::new(ExErrorKind::InvalidMigrationName).with_migration("b.sql"),
        ];

        let err = ExError::aggregate(ExErrorKind::InvalidMigrationName, errors);

        assert_eq!(err.related().len(), 2);
        assert_eq!(err.message(), "2 errors");
        let rendered = err.to_string();
        assert!(rendered.contains("a.sql"));
        assert!(rendered.contains("b.sql"));
    }

    #[test]
    fn test_std_error_source_chain() {
        use std::error::Error as _;

        let err = ExError::new(ExErrorKind::Io)
            .with_message("outer")
            .with_source(ExError::new(ExErrorKind::Io).with_message("inner"));

        let source = err.source().expect("source should be exposed");
        assert!(source.to_string().contains("inner"));
    }
}
