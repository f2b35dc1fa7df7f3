//! Tests for IndexStore
//!
//! These tests verify:
//! - Binary search results and exact comparison counts
//! - Lower-bound insertion points
//! - Ordering checks on structural mutations
//! - Persistence and reload
//! - Recovery from missing, corrupt and unsorted index files

use std::fs;
use std::path::PathBuf;

use binidx::index::{IndexEntry, IndexStore, LoadOutcome};
use binidx::storage::Region;
use binidx::BinIdxError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.json");
    (temp_dir, path)
}

/// Build a store holding `keys` (must be ascending), each in primary
fn store_with_keys(path: &PathBuf, keys: &[i32]) -> IndexStore {
    let mut store = IndexStore::new(path);
    let entries = keys
        .iter()
        .enumerate()
        .map(|(i, &k)| IndexEntry::new(k, Region::Primary, i as u64 * 64))
        .collect();
    store.replace_all(entries).unwrap();
    store
}

fn keys_of(store: &IndexStore) -> Vec<i32> {
    store.entries().iter().map(|e| e.key).collect()
}

// =============================================================================
// Binary Search Tests
// =============================================================================

#[test]
fn test_search_empty_index() {
    let (_temp, path) = setup_temp_index();
    let store = IndexStore::new(&path);

    let outcome = store.binary_search(5);

    assert_eq!(outcome.position, None);
    assert_eq!(outcome.comparisons, 0);
}

#[test]
fn test_search_middle_key_takes_one_comparison() {
    let (_temp, path) = setup_temp_index();
    let store = store_with_keys(&path, &[1, 3, 5, 7, 9]);

    let outcome = store.binary_search(5);

    assert_eq!(outcome.position, Some(2));
    assert_eq!(outcome.comparisons, 1);
}

#[test]
fn test_search_comparison_trace() {
    let (_temp, path) = setup_temp_index();
    let store = store_with_keys(&path, &[1, 3, 5, 7, 9]);

    // mid=2 (5), then mid=0 (1), then mid=1 (3)
    assert_eq!(store.binary_search(3).comparisons, 3);
    assert_eq!(store.binary_search(1).comparisons, 2);
    // mid=2 (5), then mid=3 (7), then mid=4 (9)
    assert_eq!(store.binary_search(9).comparisons, 3);
    assert_eq!(store.binary_search(7).comparisons, 2);
}

#[test]
fn test_search_missing_key_trace() {
    let (_temp, path) = setup_temp_index();
    let store = store_with_keys(&path, &[1, 3, 5, 7, 9]);

    let missing_inner = store.binary_search(4);
    assert_eq!(missing_inner.position, None);
    assert_eq!(missing_inner.comparisons, 3);

    // Below the first key: mid=2, mid=0, then right = -1
    let below = store.binary_search(0);
    assert_eq!(below.position, None);
    assert_eq!(below.comparisons, 2);

    let above = store.binary_search(100);
    assert_eq!(above.position, None);
    assert_eq!(above.comparisons, 3);
}

#[test]
fn test_search_finds_every_key() {
    let (_temp, path) = setup_temp_index();
    let keys: Vec<i32> = (0..1000).map(|k| k * 3).collect();
    let store = store_with_keys(&path, &keys);

    for (i, &key) in keys.iter().enumerate() {
        let outcome = store.binary_search(key);
        assert_eq!(outcome.position, Some(i));
        // ceil(log2(1001)) bound for a textbook search
        assert!(outcome.comparisons >= 1 && outcome.comparisons <= 10);
    }
}

// =============================================================================
// Insertion Point Tests
// =============================================================================

#[test]
fn test_insertion_point() {
    let (_temp, path) = setup_temp_index();
    let store = store_with_keys(&path, &[10, 20, 30]);

    assert_eq!(store.insertion_point(5), 0);
    assert_eq!(store.insertion_point(15), 1);
    assert_eq!(store.insertion_point(25), 2);
    assert_eq!(store.insertion_point(35), 3);
    assert_eq!(store.insertion_point(20), 1);
}

#[test]
fn test_insertion_point_empty() {
    let (_temp, path) = setup_temp_index();
    let store = IndexStore::new(&path);

    assert_eq!(store.insertion_point(i32::MIN), 0);
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_insert_at_keeps_order() {
    let (_temp, path) = setup_temp_index();
    let mut store = IndexStore::new(&path);

    for key in [50, 10, 40, 20, 30, -5] {
        let pos = store.insertion_point(key);
        store
            .insert_at(pos, IndexEntry::new(key, Region::Overflow, 0))
            .unwrap();
    }

    assert_eq!(keys_of(&store), vec![-5, 10, 20, 30, 40, 50]);
}

#[test]
fn test_insert_at_rejects_wrong_position() {
    let (_temp, path) = setup_temp_index();
    let mut store = store_with_keys(&path, &[10, 20, 30]);

    let result = store.insert_at(0, IndexEntry::new(25, Region::Overflow, 0));
    assert!(matches!(result, Err(BinIdxError::Storage(_))));

    let duplicate = store.insert_at(1, IndexEntry::new(20, Region::Overflow, 0));
    assert!(matches!(duplicate, Err(BinIdxError::Storage(_))));

    let past_end = store.insert_at(10, IndexEntry::new(40, Region::Overflow, 0));
    assert!(matches!(past_end, Err(BinIdxError::Storage(_))));

    assert_eq!(keys_of(&store), vec![10, 20, 30]);
}

#[test]
fn test_remove_at() {
    let (_temp, path) = setup_temp_index();
    let mut store = store_with_keys(&path, &[10, 20, 30]);

    let removed = store.remove_at(1).unwrap();

    assert_eq!(removed.key, 20);
    assert_eq!(keys_of(&store), vec![10, 30]);
    assert!(store.remove_at(2).is_err());
}

#[test]
fn test_replace_all_rejects_unsorted() {
    let (_temp, path) = setup_temp_index();
    let mut store = store_with_keys(&path, &[1, 2]);

    let entries = vec![
        IndexEntry::new(5, Region::Primary, 0),
        IndexEntry::new(3, Region::Primary, 64),
    ];

    assert!(matches!(
        store.replace_all(entries),
        Err(BinIdxError::IndexCorrupt(_))
    ));
    assert_eq!(keys_of(&store), vec![1, 2]);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_persist_and_load() {
    let (_temp, path) = setup_temp_index();
    let mut store = store_with_keys(&path, &[1, 3, 5]);
    store
        .insert_at(3, IndexEntry::new(8, Region::Overflow, 128))
        .unwrap();
    store.persist().unwrap();

    let (loaded, outcome) = IndexStore::load(&path);

    assert_eq!(outcome, LoadOutcome::Loaded { entries: 4 });
    assert_eq!(loaded.entries(), store.entries());
}

#[test]
fn test_persisted_json_layout() {
    let (_temp, path) = setup_temp_index();
    let mut store = IndexStore::new(&path);
    store
        .insert_at(0, IndexEntry::new(7, Region::Primary, 0))
        .unwrap();
    store
        .insert_at(1, IndexEntry::new(9, Region::Overflow, 64))
        .unwrap();
    store.persist().unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            { "key": 7, "file": "main", "offset": 0 },
            { "key": 9, "file": "overflow", "offset": 64 }
        ])
    );
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn test_load_missing_file_recovers_empty() {
    let (_temp, path) = setup_temp_index();

    let (store, outcome) = IndexStore::load(&path);

    assert!(store.is_empty());
    assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
}

#[test]
fn test_load_garbage_recovers_empty() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, b"{ not json").unwrap();

    let (store, outcome) = IndexStore::load(&path);

    assert!(store.is_empty());
    assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
}

#[test]
fn test_load_unsorted_recovers_empty() {
    let (_temp, path) = setup_temp_index();
    fs::write(
        &path,
        r#"[{"key": 5, "file": "main", "offset": 0}, {"key": 2, "file": "main", "offset": 64}]"#,
    )
    .unwrap();

    let (store, outcome) = IndexStore::load(&path);

    assert!(store.is_empty());
    assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
}

#[test]
fn test_load_unaligned_offset_recovers_empty() {
    let (_temp, path) = setup_temp_index();
    fs::write(&path, r#"[{"key": 5, "file": "overflow", "offset": 10}]"#).unwrap();

    let (store, outcome) = IndexStore::load(&path);

    assert!(store.is_empty());
    assert!(matches!(outcome, LoadOutcome::Recovered { .. }));
}
