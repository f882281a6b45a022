//! Tests for ResourceStore
//!
//! These tests verify:
//! - Write/overwrite/read of payload files
//! - Missing payloads read as None
//! - Idempotent deletion
//! - Id validation

use shelfdb::storage::ResourceStore;
use shelfdb::ShelfError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, ResourceStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = ResourceStore::new(temp_dir.path(), false);
    (temp_dir, store)
}

// =============================================================================
// Read/Write Tests
// =============================================================================

#[test]
fn test_write_then_read() {
    let (_temp, store) = setup_temp_store();

    store.write("aaaa-1111", b"payload").unwrap();

    let bytes = store.read("aaaa-1111").unwrap().unwrap();
    assert_eq!(&bytes[..], b"payload");
}

#[test]
fn test_write_overwrites() {
    let (_temp, store) = setup_temp_store();

    store.write("id", b"first version, longer").unwrap();
    store.write("id", b"second").unwrap();

    assert_eq!(&store.read("id").unwrap().unwrap()[..], b"second");
}

#[test]
fn test_write_empty_payload() {
    let (_temp, store) = setup_temp_store();

    store.write("empty", b"").unwrap();

    assert_eq!(store.read("empty").unwrap().unwrap().len(), 0);
    assert!(store.exists("empty").unwrap());
}

#[test]
fn test_read_missing_returns_none() {
    let (_temp, store) = setup_temp_store();

    assert!(store.read("missing").unwrap().is_none());
    assert!(!store.exists("missing").unwrap());
}

#[test]
fn test_sync_writes() {
    let temp_dir = TempDir::new().unwrap();
    let store = ResourceStore::new(temp_dir.path(), true);

    store.write("synced", b"durable").unwrap();

    assert_eq!(&store.read("synced").unwrap().unwrap()[..], b"durable");
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_existing() {
    let (_temp, store) = setup_temp_store();
    store.write("id", b"x").unwrap();

    assert!(store.delete("id").unwrap());
    assert!(store.read("id").unwrap().is_none());
}

#[test]
fn test_delete_absent_is_not_an_error() {
    let (_temp, store) = setup_temp_store();

    assert!(!store.delete("id").unwrap());
    assert!(!store.delete("id").unwrap());
}

// =============================================================================
// Listing & Validation Tests
// =============================================================================

#[test]
fn test_list_ids_sorted() {
    let (_temp, store) = setup_temp_store();
    store.write("c", b"").unwrap();
    store.write("a", b"").unwrap();
    store.write("b", b"").unwrap();

    assert_eq!(store.list_ids().unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn test_invalid_ids_rejected() {
    let (_temp, store) = setup_temp_store();

    for id in ["", "..", "../outside", "a/b"] {
        assert!(matches!(
            store.write(id, b"x"),
            Err(ShelfError::InvalidResourceId(_))
        ));
        assert!(matches!(
            store.read(id),
            Err(ShelfError::InvalidResourceId(_))
        ));
        assert!(matches!(
            store.delete(id),
            Err(ShelfError::InvalidResourceId(_))
        ));
    }
}
