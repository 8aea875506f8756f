//! Migration ledger
//!
//! One append-only row per applied migration. Ascending `id` is the order
//! migrations were applied in.

use crate::conn::{Executable, Queryable};
use crate::errors::{invalid_ledger_row, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "migrations";

const CREATE_LEDGER_SQL: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// A ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub id: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Create the ledger table if it does not exist yet
pub fn ensure_ledger<E: Executable>(conn: &E) -> Result<()> {
    conn.execute_script(CREATE_LEDGER_SQL)
        .map_err(|e| e.context("ensure_ledger", "creating migration table"))
}

/// Whether the ledger table has been created
pub fn ledger_exists<Q: Queryable>(conn: &Q) -> Result<bool> {
    let found = conn
        .query_rows(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            rusqlite::params![LEDGER_TABLE],
            |row| row.get::<_, i64>(0),
        )
        .map_err(|e| e.context("ledger_exists", "looking up migration table"))?;

    Ok(!found.is_empty())
}

/// Name of the most recently applied migration, if any
///
/// An empty ledger is not an error.
pub fn last_applied<Q: Queryable>(conn: &Q) -> Result<Option<String>> {
    let names = conn
        .query_rows(
            "SELECT name FROM migrations ORDER BY id DESC LIMIT 1",
            &[],
            |row| row.get::<_, String>(0),
        )
        .map_err(|e| e.context("last_applied", "querying for last migration applied"))?;

    Ok(names.into_iter().next())
}

/// Append a ledger row for the named migration
pub fn record_applied<E: Executable>(conn: &E, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO migrations (name) VALUES (?1)",
        rusqlite::params![name],
    )
    .map_err(|e| {
        e.with_migration(name)
            .context("record_applied", "inserting migration record")
    })?;

    Ok(())
}

/// Every ledger row in application order
pub fn applied_migrations<Q: Queryable>(conn: &Q) -> Result<Vec<AppliedMigration>> {
    let rows = conn
        .query_rows(
            "SELECT id, name, applied_at FROM migrations ORDER BY id ASC",
            &[],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .map_err(|e| e.context("applied_migrations", "reading migration table"))?;

    rows.into_iter()
        .map(|(id, name, applied_at)| {
            let applied_at = DateTime::parse_from_rfc3339(&applied_at)
                .map_err(|e| invalid_ledger_row(id, &e.to_string()))?
                .with_timezone(&Utc);
            Ok(AppliedMigration {
                id,
                name,
                applied_at,
            })
        })
        .collect()
}
