//! Tests for EntityList
//!
//! These tests verify:
//! - Typed add/get/remove over a partition
//! - Duplicate detection
//! - Edit without index growth
//! - Creation-time ordering of ids and records
//! - Well-known partition names

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shelfdb::{Config, EntityList, FileDatabase, PartitionName, Record, ShelfError};
use tempfile::TempDir;
use uuid::Uuid;

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Batch {
    id: Uuid,
    name: String,
    created: NaiveDateTime,
}

impl Record for Batch {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created
    }
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn batch(name: &str, minutes: i64) -> Batch {
    Batch {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created: base_time() + Duration::minutes(minutes),
    }
}

fn setup_temp_db() -> (TempDir, FileDatabase) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp_dir.path()).build();
    let db = FileDatabase::open(config).unwrap();
    (temp_dir, db)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_add_and_get() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::for_partition(&db, PartitionName::Batch);

    let b = batch("B-01", 0);
    batches.add(&b).unwrap();

    assert_eq!(batches.get(b.id).unwrap(), Some(b));
    assert_eq!(batches.get(Uuid::new_v4()).unwrap(), None);
    assert_eq!(batches.partition(), "batch");
}

#[test]
fn test_add_duplicate_rejected() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::new(&db, "batch");

    let b = batch("B-01", 0);
    batches.add(&b).unwrap();

    match batches.add(&b) {
        Err(ShelfError::DuplicateRecord { partition, id }) => {
            assert_eq!(partition, "batch");
            assert_eq!(id, b.id.to_string());
        }
        other => panic!("expected DuplicateRecord, got {:?}", other),
    }
    assert_eq!(batches.len().unwrap(), 1);
}

#[test]
fn test_remove() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::new(&db, "batch");

    let b = batch("B-01", 0);
    batches.add(&b).unwrap();

    assert!(batches.remove(&b).unwrap());
    assert!(!batches.remove(&b).unwrap());
    assert_eq!(batches.get(b.id).unwrap(), None);
}

#[test]
fn test_remove_requires_equal_record() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::new(&db, "batch");

    let b = batch("B-01", 0);
    batches.add(&b).unwrap();

    let mut stale = b.clone();
    stale.name = "renamed".to_string();

    assert!(!batches.remove(&stale).unwrap());
    assert_eq!(batches.len().unwrap(), 1);
}

#[test]
fn test_edit_keeps_single_entry() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::new(&db, "batch");

    let mut b = batch("B-01", 0);
    batches.add(&b).unwrap();

    b.name = "B-01 (evening)".to_string();
    batches.edit(&b).unwrap();
    batches.edit(&b).unwrap();

    assert_eq!(batches.len().unwrap(), 1);
    assert_eq!(batches.get(b.id).unwrap().unwrap().name, "B-01 (evening)");
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_ids_and_all_ordered_by_creation() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::new(&db, "batch");

    let late = batch("late", 30);
    let early = batch("early", 0);
    let middle = batch("middle", 15);
    for b in [&late, &early, &middle] {
        batches.add(b).unwrap();
    }

    assert_eq!(batches.ids().unwrap(), vec![early.id, middle.id, late.id]);

    let names: Vec<String> = batches.all().unwrap().into_iter().map(|b| b.name).collect();
    assert_eq!(names, vec!["early", "middle", "late"]);
}

#[test]
fn test_ids_reject_non_uuid_entries() {
    let (_temp, db) = setup_temp_db();
    db.add_resource("batch", base_time(), "not-a-uuid", &batch("x", 0))
        .unwrap();

    let batches: EntityList<Batch> = EntityList::new(&db, "batch");
    assert!(matches!(
        batches.ids(),
        Err(ShelfError::Serialization(_))
    ));
}

// =============================================================================
// Partition Tests
// =============================================================================

#[test]
fn test_remove_all() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::new(&db, "batch");
    batches.add(&batch("a", 0)).unwrap();
    batches.add(&batch("b", 1)).unwrap();

    batches.remove_all().unwrap();

    assert!(batches.ids().unwrap().is_empty());
    assert_eq!(batches.len().unwrap(), 0);
}

#[test]
fn test_lists_are_isolated_by_partition() {
    let (_temp, db) = setup_temp_db();
    let batches: EntityList<Batch> = EntityList::for_partition(&db, PartitionName::Batch);
    let others: EntityList<Batch> = EntityList::for_partition(&db, PartitionName::FacultyUser);

    let b = batch("shared", 0);
    batches.add(&b).unwrap();
    others.add(&b).unwrap();
    batches.remove_all().unwrap();

    assert_eq!(others.get(b.id).unwrap(), Some(b));
}

#[test]
fn test_partition_names() {
    let names: Vec<&str> = PartitionName::ALL.iter().map(|p| p.as_str()).collect();
    assert_eq!(names, vec!["course", "faculty", "batch", "faculty-user"]);
    assert_eq!(PartitionName::FacultyUser.to_string(), "faculty-user");
}
