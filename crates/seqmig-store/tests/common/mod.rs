use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// Directory holding the three-step fixture migrations
#[allow(dead_code)]
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
}

/// Open a fresh on-disk database inside `dir`
///
/// On-disk rather than in-memory so that VACUUM behaves as it does in
/// production.
#[allow(dead_code)]
pub fn fresh_db(dir: &TempDir) -> Connection {
    let conn = seqmig_store::db::open(dir.path().join("store.db")).unwrap();
    seqmig_store::db::configure(&conn, seqmig_store::db::DEFAULT_BUSY_TIMEOUT).unwrap();
    conn
}

#[allow(dead_code)]
pub fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn index_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn ledger_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
        .unwrap()
}

#[allow(dead_code)]
pub fn ledger_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM migrations ORDER BY id")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    names
}
