//! Migration name parsing
//!
//! A migration name is `<numeric-prefix>[.<tag>]*.<ext>`. The prefix orders
//! the plan; the `no-tx` tag opts a migration out of transactional
//! execution. Every other tag is free text.

use crate::errors::{ExError, ExErrorKind, MigrationError, Result};

/// Tag marking a migration that must run outside a transaction block
pub const NO_TX_MARKER: &str = "no-tx";

/// Split a migration name into its dot-separated attributes
pub fn migration_attributes(name: &str) -> impl Iterator<Item = &str> {
    name.split('.')
}

/// The ordering prefix of a migration name (everything before the first `.`)
pub fn migration_prefix(name: &str) -> &str {
    name.split_once('.').map_or(name, |(prefix, _)| prefix)
}

/// Whether a migration with these attributes runs inside a transaction
///
/// The marker may appear at any position.
pub fn is_migration_tx<'a>(attributes: impl IntoIterator<Item = &'a str>) -> bool {
    !attributes.into_iter().any(|attr| attr == NO_TX_MARKER)
}

/// Parse the numeric ordering key of a migration name
pub fn parse_prefix(name: &str) -> std::result::Result<i64, MigrationError> {
    let prefix = migration_prefix(name);
    prefix
        .parse::<i64>()
        .map_err(|e| MigrationError::InvalidPrefix {
            name: name.to_string(),
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })
}

/// Sort migration names ascending by numeric prefix.
///
/// Every prefix is parsed before anything is sorted; all failures are
/// collected and returned together as one composite error. Names sharing a
/// prefix are ordered by full name, independent of listing order.
pub fn sort_migrations(names: Vec<String>) -> Result<Vec<String>> {
    let mut keyed: Vec<(i64, String)> = Vec::with_capacity(names.len());
    let mut errors: Vec<ExError> = Vec::new();

    for name in names {
        match parse_prefix(&name) {
            Ok(key) => keyed.push((key, name)),
            Err(err) => errors.push(err.into()),
        }
    }

    if !errors.is_empty() {
        return Err(ExError::aggregate(ExErrorKind::InvalidMigrationName, errors)
            .with_op("sort_migrations")
            .with_message("unparseable migration prefixes"));
    }

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    for pair in keyed.windows(2) {
        if pair[0].0 == pair[1].0 {
            tracing::warn!(
                op = "sort_migrations",
                first = %pair[0].1,
                second = %pair[1].1,
                prefix = pair[0].0,
                "duplicate migration prefix"
            );
        }
    }

    Ok(keyed.into_iter().map(|(_, name)| name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_migration_prefix() {
        assert_eq!(migration_prefix("001.sql"), "001");
        assert_eq!(migration_prefix("001.tx.sql"), "001");
        assert_eq!(migration_prefix("001.no-tx.sql"), "001");
        assert_eq!(migration_prefix("001.no-tx.other.sql"), "001");
        assert_eq!(migration_prefix("007"), "007");
    }

    #[test]
    fn test_is_migration_tx_any_position() {
        assert!(is_migration_tx(migration_attributes("001.sql")));
        assert!(is_migration_tx(migration_attributes("001.tx.sql")));
        assert!(!is_migration_tx(migration_attributes("002.no-tx.sql")));
        assert!(!is_migration_tx(migration_attributes("002.index.no-tx.sql")));
        assert!(!is_migration_tx(migration_attributes("002.sql.no-tx")));
        // Only an exact tag counts
        assert!(is_migration_tx(migration_attributes("002.no-txn.sql")));
    }

    #[test]
    fn test_sort_simple_case() {
        let sorted = sort_migrations(names(&["002.sql", "001.sql", "003.sql"])).unwrap();
        assert_eq!(sorted, names(&["001.sql", "002.sql", "003.sql"]));
    }

    #[test]
    fn test_sort_with_tags() {
        let sorted =
            sort_migrations(names(&["002.no-tx.sql", "001.sql", "003.tx.sql"])).unwrap();
        assert_eq!(sorted, names(&["001.sql", "002.no-tx.sql", "003.tx.sql"]));
    }

    #[test]
    fn test_sort_is_numeric_not_lexical() {
        let sorted = sort_migrations(names(&["10.sql", "9.sql", "100.sql", "0011.sql"])).unwrap();
        assert_eq!(sorted, names(&["9.sql", "10.sql", "0011.sql", "100.sql"]));
    }

    #[test]
    fn test_sort_duplicate_prefix_ignores_listing_order() {
        let expected = names(&["002.a.sql", "002.b.no-tx.sql", "003.sql"]);

        let one = sort_migrations(names(&["002.b.no-tx.sql", "003.sql", "002.a.sql"])).unwrap();
        let other = sort_migrations(names(&["002.a.sql", "002.b.no-tx.sql", "003.sql"])).unwrap();

        assert_eq!(one, expected);
        assert_eq!(other, expected);
    }

    #[test]
    fn test_sort_aggregates_every_bad_prefix() {
        let err = sort_migrations(names(&["001.sql", "abc.sql", "002.sql", "x1.sql"]))
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::InvalidMigrationName);
        let bad: Vec<_> = err.related().iter().filter_map(|e| e.migration()).collect();
        assert_eq!(bad, vec!["abc.sql", "x1.sql"]);
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_migrations(Vec::new()).unwrap().is_empty());
    }
}
