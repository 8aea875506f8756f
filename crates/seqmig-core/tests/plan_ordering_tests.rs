#![allow(clippy::unwrap_used, clippy::expect_used)]

// Ordering and attribute properties of the plan builder

use proptest::prelude::*;
use seqmig_core::errors::ExErrorKind;
use seqmig_core::plan::{build_plan, migration_prefix, sort_migrations, EmbeddedSource};

fn prefix_value(name: &str) -> i64 {
    migration_prefix(name).parse().unwrap()
}

proptest! {
    #[test]
    fn prop_plan_sorted_regardless_of_listing_order(
        prefixes in prop::collection::btree_set(0i64..100_000, 0..40),
        seed in any::<u64>(),
    ) {
        let mut names: Vec<String> = prefixes.iter().map(|p| format!("{:05}.sql", p)).collect();

        // Deterministic shuffle driven by the seed
        let len = names.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state % (i as u64 + 1)) as usize;
                names.swap(i, j);
            }
        }

        let sorted = sort_migrations(names).unwrap();
        prop_assert_eq!(sorted.len(), prefixes.len());
        for pair in sorted.windows(2) {
            prop_assert!(prefix_value(&pair[0]) < prefix_value(&pair[1]));
        }
    }

    #[test]
    fn prop_no_tx_marker_in_any_position(
        tags in prop::collection::vec("[a-z]{1,6}", 0..4),
        position in 0usize..5,
    ) {
        let mut tags = tags;
        let at = position.min(tags.len());
        tags.insert(at, "no-tx".to_string());

        let name = format!("001.{}.sql", tags.join("."));
        let source = EmbeddedSource::new().with_entry(name.clone(), "SELECT 1;");
        let plan = build_plan(&source).unwrap();

        prop_assert_eq!(&plan.definitions()[0].name, &name);
        prop_assert!(!plan.definitions()[0].run_inside_transaction);
    }

    #[test]
    fn prop_absent_marker_is_transactional(
        tags in prop::collection::vec("[a-z]{1,6}", 0..4),
    ) {
        let name = if tags.is_empty() {
            "001.sql".to_string()
        } else {
            format!("001.{}.sql", tags.join("."))
        };
        let source = EmbeddedSource::new().with_entry(name, "SELECT 1;");
        let plan = build_plan(&source).unwrap();

        prop_assert!(plan.definitions()[0].run_inside_transaction);
    }
}

#[test]
fn test_unparseable_prefixes_are_all_reported() {
    let source = EmbeddedSource::new()
        .with_entry("001.sql", "SELECT 1;")
        .with_entry("init.sql", "SELECT 2;")
        .with_entry("002.sql", "SELECT 3;")
        .with_entry("v3.sql", "SELECT 4;")
        .with_entry("notes", "text");

    let err = build_plan(&source).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidMigrationName);
    let mut bad: Vec<&str> = err.related().iter().filter_map(|e| e.migration()).collect();
    bad.sort();
    assert_eq!(bad, vec!["init.sql", "notes", "v3.sql"]);

    let rendered = err.to_string();
    for name in ["init.sql", "notes", "v3.sql"] {
        assert!(rendered.contains(name), "missing {} in {}", name, rendered);
    }
}

#[test]
fn test_dir_source_plan_matches_embedded_plan() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("002.no-tx.sql"), "VACUUM;").unwrap();
    std::fs::write(dir.path().join("001.sql"), "CREATE TABLE users (name TEXT);").unwrap();
    std::fs::create_dir(dir.path().join("drafts")).unwrap();
    std::fs::write(dir.path().join("drafts").join("003.sql"), "SELECT 1;").unwrap();

    let from_dir = build_plan(&seqmig_core::DirSource::new(dir.path())).unwrap();
    let from_memory = build_plan(
        &EmbeddedSource::new()
            .with_entry("001.sql", "CREATE TABLE users (name TEXT);")
            .with_entry("002.no-tx.sql", "VACUUM;"),
    )
    .unwrap();

    assert_eq!(from_dir, from_memory);
}
