//! Database capability traits
//!
//! The runner and ledger only need three capabilities: execute statements,
//! query rows, and open a transaction. Every function that touches the
//! database takes the handle it should use explicitly, so the caller
//! decides whether work happens on the connection or inside a transaction.

use crate::errors::{from_rusqlite, Result};
use rusqlite::types::ToSql;
use rusqlite::{Connection, Row, Transaction};

/// Run statements that return no rows
pub trait Executable {
    /// Execute a single parameterised statement, returning affected rows
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize>;

    /// Execute a script of one or more statements
    fn execute_script(&self, sql: &str) -> Result<()>;
}

/// Run queries that return rows
pub trait Queryable {
    /// Run a query and map every row
    fn query_rows<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>;
}

/// An open transaction
///
/// Dropping a handle without committing rolls the transaction back.
pub trait TxHandle: Executable + Queryable {
    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

/// A connection able to open transactions
pub trait Transactional: Executable + Queryable {
    type Tx<'t>: TxHandle
    where
        Self: 't;

    fn begin(&mut self) -> Result<Self::Tx<'_>>;
}

fn execute_on(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
    conn.execute(sql, params).map_err(from_rusqlite)
}

fn execute_script_on(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute_batch(sql).map_err(from_rusqlite)
}

fn query_rows_on<T, F>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
    map: F,
) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt.query_map(params, map).map_err(from_rusqlite)?;
    let collected: rusqlite::Result<Vec<T>> = rows.collect();
    collected.map_err(from_rusqlite)
}

impl Executable for Connection {
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        execute_on(self, sql, params)
    }

    fn execute_script(&self, sql: &str) -> Result<()> {
        execute_script_on(self, sql)
    }
}

impl Queryable for Connection {
    fn query_rows<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        query_rows_on(self, sql, params, map)
    }
}

impl Transactional for Connection {
    type Tx<'t> = Transaction<'t>;

    fn begin(&mut self) -> Result<Transaction<'_>> {
        self.transaction().map_err(from_rusqlite)
    }
}

impl Executable for Transaction<'_> {
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        execute_on(self, sql, params)
    }

    fn execute_script(&self, sql: &str) -> Result<()> {
        execute_script_on(self, sql)
    }
}

impl Queryable for Transaction<'_> {
    fn query_rows<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        query_rows_on(self, sql, params, map)
    }
}

impl TxHandle for Transaction<'_> {
    fn commit(self) -> Result<()> {
        Transaction::commit(self).map_err(from_rusqlite)
    }

    fn rollback(self) -> Result<()> {
        Transaction::rollback(self).map_err(from_rusqlite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT NOT NULL);")
            .unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_execute_and_query_through_traits() {
        let conn = setup();

        let affected = Executable::execute(&conn, "INSERT INTO t (v) VALUES (?1)", &[&"a"]).unwrap();
        assert_eq!(affected, 1);

        let values = conn
            .query_rows("SELECT v FROM t", &[], |row| row.get::<_, String>(0))
            .unwrap();
        assert_eq!(values, vec!["a".to_string()]);
    }

    #[test]
    fn test_commit_persists() {
        let mut conn = setup();

        let tx = conn.begin().unwrap();
        tx.execute_script("INSERT INTO t (v) VALUES ('x');").unwrap();
        TxHandle::commit(tx).unwrap();

        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_rollback_and_drop_discard() {
        let mut conn = setup();

        let tx = conn.begin().unwrap();
        tx.execute_script("INSERT INTO t (v) VALUES ('x');").unwrap();
        TxHandle::rollback(tx).unwrap();
        assert_eq!(count(&conn), 0);

        {
            let tx = conn.begin().unwrap();
            tx.execute_script("INSERT INTO t (v) VALUES ('y');").unwrap();
        }
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_sql_error_is_persistence_kind() {
        let conn = setup();

        let err = conn.execute_script("INSERT INTO missing VALUES (1);").unwrap_err();
        assert_eq!(err.kind(), seqmig_core::ExErrorKind::Persistence);
        assert!(err.to_string().contains("no such table"));
    }
}
