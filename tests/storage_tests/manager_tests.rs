//! Tests for StorageManager
//!
//! These tests verify:
//! - Opening/creating both region files
//! - Routing block I/O by region tag
//! - Rebuilding primary from sorted records
//! - Staging, committing and discarding a primary rebuild
//! - Clearing overflow and resetting both regions

use std::path::PathBuf;

use binidx::record::{decode, encode, Record, ValuePolicy};
use binidx::storage::{Region, StorageManager};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_storage() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn records(keys: &[i32]) -> Vec<Record> {
    keys.iter()
        .map(|&key| Record {
            key,
            value: format!("Value for {}", key),
        })
        .collect()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_directory_and_regions() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("new_storage");

    let manager = StorageManager::open(&path).unwrap();

    assert!(path.join(StorageManager::PRIMARY_FILENAME).exists());
    assert!(path.join(StorageManager::OVERFLOW_FILENAME).exists());
    assert_eq!(manager.data_dir(), path.as_path());
}

#[test]
fn test_reopen_keeps_data() {
    let (_temp, path) = setup_temp_storage();
    let block = encode(3, "three", ValuePolicy::Truncate).unwrap();

    {
        let manager = StorageManager::open(&path).unwrap();
        manager.append_block(Region::Overflow, &block).unwrap();
    }

    let manager = StorageManager::open(&path).unwrap();
    assert_eq!(manager.read_block(Region::Overflow, 0).unwrap(), block);
}

// =============================================================================
// Region Routing Tests
// =============================================================================

#[test]
fn test_regions_are_independent() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();

    manager.rewrite_primary(&records(&[1]), ValuePolicy::Truncate).unwrap();
    let overflow_block = encode(2, "two", ValuePolicy::Truncate).unwrap();
    let offset = manager.append_block(Region::Overflow, &overflow_block).unwrap();

    assert_eq!(offset, 0);
    assert_eq!(decode(&manager.read_block(Region::Primary, 0).unwrap()).key, 1);
    assert_eq!(decode(&manager.read_block(Region::Overflow, 0).unwrap()).key, 2);
}

#[test]
fn test_write_block_routes_to_region() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    manager.rewrite_primary(&records(&[1, 2]), ValuePolicy::Truncate).unwrap();

    let updated = encode(2, "changed", ValuePolicy::Truncate).unwrap();
    manager.write_block(Region::Primary, 64, &updated).unwrap();

    assert_eq!(decode(&manager.read_block(Region::Primary, 64).unwrap()).value, "changed");
    assert_eq!(manager.region(Region::Overflow).len().unwrap(), 0);
}

// =============================================================================
// Rewrite / Reset Tests
// =============================================================================

#[test]
fn test_rewrite_primary_offsets() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    let input = records(&[4, 8, 15, 16, 23, 42]);

    let offsets = manager.rewrite_primary(&input, ValuePolicy::Truncate).unwrap();

    assert_eq!(offsets, vec![0, 64, 128, 192, 256, 320]);
    for (record, offset) in input.iter().zip(&offsets) {
        let block = manager.read_block(Region::Primary, *offset).unwrap();
        assert_eq!(&decode(&block), record);
    }
}

#[test]
fn test_rewrite_primary_shrinks_region() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    manager.rewrite_primary(&records(&[1, 2, 3, 4]), ValuePolicy::Truncate).unwrap();

    manager.rewrite_primary(&records(&[9]), ValuePolicy::Truncate).unwrap();

    assert_eq!(manager.region(Region::Primary).len().unwrap(), 64);
}

#[test]
fn test_staged_primary_is_invisible_until_commit() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    manager.rewrite_primary(&records(&[1, 2]), ValuePolicy::Truncate).unwrap();
    let before = std::fs::read(path.join("main.db")).unwrap();

    let offsets = manager.stage_primary(&records(&[7, 8, 9]), ValuePolicy::Truncate).unwrap();

    assert_eq!(offsets, vec![0, 64, 128]);
    assert_eq!(std::fs::read(path.join("main.db")).unwrap(), before);
    assert!(path.join("main.db.tmp").exists());

    manager.commit_primary().unwrap();

    assert!(!path.join("main.db.tmp").exists());
    assert_eq!(manager.region(Region::Primary).len().unwrap(), 3 * 64);
    let block = manager.read_block(Region::Primary, 128).unwrap();
    assert_eq!(decode(&block).key, 9);
}

#[test]
fn test_discard_primary_stage() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    manager.rewrite_primary(&records(&[1]), ValuePolicy::Truncate).unwrap();
    manager.stage_primary(&records(&[5, 6]), ValuePolicy::Truncate).unwrap();

    manager.discard_primary_stage().unwrap();
    // Nothing staged is fine too
    manager.discard_primary_stage().unwrap();

    assert!(!path.join("main.db.tmp").exists());
    assert_eq!(manager.region(Region::Primary).len().unwrap(), 64);
    assert_eq!(decode(&manager.read_block(Region::Primary, 0).unwrap()).key, 1);
}

#[test]
fn test_clear_overflow_leaves_primary() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    manager.rewrite_primary(&records(&[1]), ValuePolicy::Truncate).unwrap();
    let block = encode(2, "two", ValuePolicy::Truncate).unwrap();
    manager.append_block(Region::Overflow, &block).unwrap();

    manager.clear_overflow().unwrap();

    assert_eq!(manager.region(Region::Overflow).len().unwrap(), 0);
    assert_eq!(manager.region(Region::Primary).len().unwrap(), 64);
}

#[test]
fn test_reset_empties_both() {
    let (_temp, path) = setup_temp_storage();
    let manager = StorageManager::open(&path).unwrap();
    manager.rewrite_primary(&records(&[1, 2]), ValuePolicy::Truncate).unwrap();
    let block = encode(3, "three", ValuePolicy::Truncate).unwrap();
    manager.append_block(Region::Overflow, &block).unwrap();

    manager.reset().unwrap();

    assert!(manager.region(Region::Primary).is_empty().unwrap());
    assert!(manager.region(Region::Overflow).is_empty().unwrap());
}
