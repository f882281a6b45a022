//! Records and entity lists
//!
//! Typed access to a partition whose records carry their own id and creation
//! time. Creation time is the ordering key, the UUID is the record id.

use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::codec::{BincodeCodec, Codec};
use crate::database::FileDatabase;
use crate::error::{Result, ShelfError};

/// A value that can live in an `EntityList`
pub trait Record: Serialize + DeserializeOwned + PartialEq {
    /// Stable unique id (the record's file name)
    fn id(&self) -> Uuid;

    /// Creation time (the record's ordering key)
    fn created_at(&self) -> NaiveDateTime;
}

/// Well-known partition names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionName {
    Course,
    Faculty,
    Batch,
    FacultyUser,
}

impl PartitionName {
    pub const ALL: [PartitionName; 4] = [
        PartitionName::Course,
        PartitionName::Faculty,
        PartitionName::Batch,
        PartitionName::FacultyUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionName::Course => "course",
            PartitionName::Faculty => "faculty",
            PartitionName::Batch => "batch",
            PartitionName::FacultyUser => "faculty-user",
        }
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partition viewed as a list of `T` records
pub struct EntityList<'db, T, C = BincodeCodec> {
    db: &'db FileDatabase<NaiveDateTime, C>,
    partition: String,
    _record: PhantomData<fn() -> T>,
}

impl<'db, T: Record, C: Codec> EntityList<'db, T, C> {
    pub fn new(db: &'db FileDatabase<NaiveDateTime, C>, partition: impl Into<String>) -> Self {
        Self {
            db,
            partition: partition.into(),
            _record: PhantomData,
        }
    }

    /// Entity list over one of the well-known partitions
    pub fn for_partition(db: &'db FileDatabase<NaiveDateTime, C>, name: PartitionName) -> Self {
        Self::new(db, name.as_str())
    }

    /// Add a record, rejecting one equal to a record already stored
    pub fn add(&self, record: &T) -> Result<()> {
        if self.db.is_resource_present(&self.partition, record)? {
            return Err(ShelfError::DuplicateRecord {
                partition: self.partition.clone(),
                id: record.id().to_string(),
            });
        }

        self.db.add_resource(
            &self.partition,
            record.created_at(),
            &record.id().to_string(),
            record,
        )?;
        Ok(())
    }

    /// Remove a record if an equal one is stored. Returns whether it was.
    pub fn remove(&self, record: &T) -> Result<bool> {
        if !self.db.is_resource_present(&self.partition, record)? {
            return Ok(false);
        }
        self.db
            .remove_resource(&self.partition, &record.id().to_string())
    }

    /// Drop every record (deletes the partition)
    pub fn remove_all(&self) -> Result<()> {
        self.db.remove_partition(&self.partition)?;
        Ok(())
    }

    /// Get a record by id
    pub fn get(&self, id: Uuid) -> Result<Option<T>> {
        self.db.get_resource(&self.partition, &id.to_string())
    }

    /// Replace the stored record with the same id
    pub fn edit(&self, record: &T) -> Result<()> {
        self.db.edit_resource(
            &self.partition,
            record.created_at(),
            &record.id().to_string(),
            record,
        )?;
        Ok(())
    }

    /// Record ids, oldest first
    pub fn ids(&self) -> Result<Vec<Uuid>> {
        self.db
            .get_ids_of_resources(&self.partition)?
            .iter()
            .map(|id| {
                Uuid::parse_str(id).map_err(|e| {
                    ShelfError::Serialization(format!("invalid record id {:?}: {}", id, e))
                })
            })
            .collect()
    }

    /// All records, oldest first
    pub fn all(&self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for id in self.db.get_ids_of_resources(&self.partition)? {
            if let Some(record) = self.db.get_resource(&self.partition, &id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Number of index entries
    pub fn len(&self) -> Result<usize> {
        self.db.len(&self.partition)
    }

    /// Get the partition name
    pub fn partition(&self) -> &str {
        &self.partition
    }
}
