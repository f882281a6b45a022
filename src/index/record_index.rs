//! Record Index
//!
//! Sorted (ordering key → id) mapping for one partition, loaded and
//! persisted as a whole on every operation.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;

use tracing::debug;

use crate::error::{Result, ShelfError};
use crate::storage::{atomic_write, PartitionPaths};

use super::{OrderingKey, FOOTER_SIZE, HEADER_SIZE, MAGIC, MAX_ENTRIES, VERSION};

/// In-memory view of a partition's `record.idx`
///
/// Keys are unique: inserting an existing ordering key replaces its id.
/// Ids are not: the same id may appear under several keys.
#[derive(Debug, Clone)]
pub struct RecordIndex<K> {
    /// Owning partition (for error reporting)
    partition: String,
    /// ordering key → record id, ascending
    entries: BTreeMap<K, String>,
    /// Max entries accepted by `insert`
    capacity: usize,
}

impl<K: OrderingKey> RecordIndex<K> {
    /// Create an empty index for `partition`
    pub fn new(partition: &str) -> Self {
        Self {
            partition: partition.to_string(),
            entries: BTreeMap::new(),
            capacity: MAX_ENTRIES,
        }
    }

    /// Lower the entry limit (clamped to `MAX_ENTRIES`)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.min(MAX_ENTRIES);
        self
    }

    /// Load the persisted index, or an empty one if the file does not exist
    pub fn load(paths: &PartitionPaths) -> Result<Self> {
        let data = match fs::read(&paths.index) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new(&paths.name)),
            Err(e) => return Err(e.into()),
        };

        let entries = Self::decode(&data).map_err(|reason| ShelfError::IndexCorrupted {
            path: paths.index.clone(),
            reason,
        })?;

        debug!(partition = %paths.name, entries = entries.len(), "loaded index");

        Ok(Self {
            partition: paths.name.clone(),
            entries,
            capacity: MAX_ENTRIES,
        })
    }

    /// Serialize and replace the persisted index
    pub fn store(&self, paths: &PartitionPaths, sync: bool) -> Result<()> {
        let data = self.encode()?;
        atomic_write(&paths.index, &data, sync)?;

        debug!(partition = %paths.name, entries = self.entries.len(), "stored index");
        Ok(())
    }

    /// Insert `(key, id)`, returning the new entry count
    ///
    /// Fails with `CapacityExceeded` when the index is already full, leaving
    /// it untouched.
    pub fn insert(&mut self, key: K, id: &str) -> Result<usize> {
        if self.entries.len() >= self.capacity {
            return Err(ShelfError::CapacityExceeded {
                partition: self.partition.clone(),
                capacity: self.capacity,
            });
        }

        self.entries.insert(key, id.to_string());
        Ok(self.entries.len())
    }

    /// Remove the first entry (in key order) pointing at `id`
    ///
    /// Returns `false` if no entry references `id`.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let mut removed = false;
        self.entries.retain(|_, v| {
            if !removed && v == id {
                removed = true;
                return false;
            }
            true
        });
        removed
    }

    /// Remove every entry pointing at `id`, returning how many were dropped
    pub fn remove_all_by_id(&mut self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, v| v != id);
        before - self.entries.len()
    }

    /// Distinct ids in ordering-key order (first occurrence wins)
    pub fn ids(&self) -> Vec<String> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .values()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    /// Whether any entry references `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.values().any(|v| v == id)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Get the entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the effective entry limit
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    fn encode(&self) -> Result<Vec<u8>> {
        let entries: Vec<(&K, &String)> = self.entries.iter().collect();
        let payload = bincode::serialize(&entries)?;

        let mut data = Vec::with_capacity(HEADER_SIZE + payload.len() + FOOTER_SIZE);
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&VERSION.to_le_bytes());
        data.extend_from_slice(&(entries.len() as u64).to_le_bytes());
        data.extend_from_slice(&payload);
        data.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        Ok(data)
    }

    fn decode(data: &[u8]) -> std::result::Result<BTreeMap<K, String>, String> {
        if data.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(format!("file too short ({} bytes)", data.len()));
        }

        if &data[0..4] != MAGIC {
            return Err(format!("invalid magic: {:?}", &data[0..4]));
        }

        let mut version = [0u8; 2];
        version.copy_from_slice(&data[4..6]);
        let version = u16::from_le_bytes(version);
        if version != VERSION {
            return Err(format!("unsupported version: {}", version));
        }

        let mut count = [0u8; 8];
        count.copy_from_slice(&data[6..HEADER_SIZE]);
        let count = u64::from_le_bytes(count);

        let payload = &data[HEADER_SIZE..data.len() - FOOTER_SIZE];
        let mut stored_crc = [0u8; 4];
        stored_crc.copy_from_slice(&data[data.len() - FOOTER_SIZE..]);
        let stored_crc = u32::from_le_bytes(stored_crc);

        let computed_crc = crc32fast::hash(payload);
        if stored_crc != computed_crc {
            return Err(format!(
                "CRC mismatch: stored={:#010x}, computed={:#010x}",
                stored_crc, computed_crc
            ));
        }

        let pairs: Vec<(K, String)> =
            bincode::deserialize(payload).map_err(|e| format!("payload decode failed: {}", e))?;

        let entries: BTreeMap<K, String> = pairs.into_iter().collect();
        if entries.len() as u64 != count {
            return Err(format!(
                "entry count mismatch: header={}, payload={}",
                count,
                entries.len()
            ));
        }

        Ok(entries)
    }
}
