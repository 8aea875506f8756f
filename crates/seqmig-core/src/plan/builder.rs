//! Plan builder
//!
//! Reads a migration source and produces the ordered plan.

use super::naming::{is_migration_tx, migration_attributes, sort_migrations};
use super::source::MigrationSource;
use super::{MigrationDefinition, MigrationPlan};
use crate::errors::Result;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Build the migration plan from a source.
///
/// Lists every entry, sorts by numeric prefix (failing with every
/// unparseable name at once) and reads each entry's content in plan
/// order. Only reads; identical sources always yield identical plans.
pub fn build_plan<S: MigrationSource + ?Sized>(source: &S) -> Result<MigrationPlan> {
    let start = Instant::now();
    log_op_start!("build_plan");

    match read_plan(source) {
        Ok(plan) => {
            log_op_end!(
                "build_plan",
                duration_ms = start.elapsed().as_millis() as u64,
                plan_len = plan.len()
            );
            Ok(plan)
        }
        Err(err) => {
            log_op_error!(
                "build_plan",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn read_plan<S: MigrationSource + ?Sized>(source: &S) -> Result<MigrationPlan> {
    let names = sort_migrations(source.list_entries()?)?;

    let mut definitions = Vec::with_capacity(names.len());
    for name in names {
        let content = source.read_entry(&name)?;
        let run_inside_transaction = is_migration_tx(migration_attributes(&name));
        definitions.push(MigrationDefinition {
            name,
            content,
            run_inside_transaction,
        });
    }

    Ok(MigrationPlan::new(definitions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::plan::EmbeddedSource;

    #[test]
    fn test_build_plan_orders_and_flags() {
        let source = EmbeddedSource::new()
            .with_entry("003.tx.sql", "CREATE TABLE records (field TEXT);")
            .with_entry("001.sql", "CREATE TABLE users (name TEXT NOT NULL);")
            .with_entry("002.no-tx.sql", "VACUUM;");

        let plan = build_plan(&source).unwrap();

        assert_eq!(
            plan.definitions(),
            &[
                MigrationDefinition {
                    name: "001.sql".to_string(),
                    content: "CREATE TABLE users (name TEXT NOT NULL);".to_string(),
                    run_inside_transaction: true,
                },
                MigrationDefinition {
                    name: "002.no-tx.sql".to_string(),
                    content: "VACUUM;".to_string(),
                    run_inside_transaction: false,
                },
                MigrationDefinition {
                    name: "003.tx.sql".to_string(),
                    content: "CREATE TABLE records (field TEXT);".to_string(),
                    run_inside_transaction: true,
                },
            ]
        );
    }

    #[test]
    fn test_build_plan_fails_before_reading_on_bad_names() {
        let source = EmbeddedSource::new()
            .with_entry("001.sql", "SELECT 1;")
            .with_entry("README.md", "docs")
            .with_entry("two.sql", "SELECT 2;");

        let err = build_plan(&source).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::InvalidMigrationName);
        assert_eq!(err.related().len(), 2);
    }

    #[test]
    fn test_build_plan_empty_source() {
        let plan = build_plan(&EmbeddedSource::new()).unwrap();
        assert!(plan.is_empty());
    }
}
