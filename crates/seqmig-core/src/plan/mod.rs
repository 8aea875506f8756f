//! Migration plan
//!
//! Turns a migration source into an ordered, immutable plan and locates
//! the point a run resumes from.

mod builder;
pub mod naming;
mod source;

pub use builder::build_plan;
pub use naming::{
    is_migration_tx, migration_attributes, migration_prefix, sort_migrations, NO_TX_MARKER,
};
pub use source::{DirSource, EmbeddedSource, MigrationSource};

/// One migration unit, built from a single source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDefinition {
    /// Source file name, including prefix and tags
    pub name: String,
    /// Statements executed against the database
    pub content: String,
    /// False when the name carries the `no-tx` tag
    pub run_inside_transaction: bool,
}

/// Where a run picks up in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    /// Nothing applied yet, or the last applied migration is not in the plan
    Start,
    /// The migration at this index was the last one applied
    After(usize),
}

impl ResumePoint {
    /// Index of the first migration still to apply
    pub fn first_pending(self) -> usize {
        match self {
            ResumePoint::Start => 0,
            ResumePoint::After(index) => index + 1,
        }
    }
}

/// Ordered sequence of migrations, ascending by numeric prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    definitions: Vec<MigrationDefinition>,
}

impl MigrationPlan {
    /// Wrap definitions that are already in plan order
    pub fn new(definitions: Vec<MigrationDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[MigrationDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MigrationDefinition> {
        self.definitions.iter()
    }

    /// Find where to resume given the last applied migration name.
    ///
    /// Linear scan on name equality; `None` or an unknown name resumes at
    /// the start of the plan.
    pub fn resume_point(&self, last_applied: Option<&str>) -> ResumePoint {
        let Some(last) = last_applied else {
            return ResumePoint::Start;
        };

        for (index, definition) in self.definitions.iter().enumerate() {
            if definition.name == last {
                return ResumePoint::After(index);
            }
        }

        ResumePoint::Start
    }

    /// Migrations strictly after the resume point, in plan order
    pub fn pending(&self, resume: ResumePoint) -> &[MigrationDefinition] {
        let start = resume.first_pending().min(self.definitions.len());
        &self.definitions[start..]
    }
}

impl<'a> IntoIterator for &'a MigrationPlan {
    type Item = &'a MigrationDefinition;
    type IntoIter = std::slice::Iter<'a, MigrationDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
