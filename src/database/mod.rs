//! Database Module
//!
//! The `FileDatabase` facade: composes directory management, the record
//! index and the resource store into one call per operation.
//!
//! ## Responsibilities
//! - Lazily create partitions on first use
//! - Keep the index and the data directory consistent
//! - Enforce the per-partition capacity
//! - Serialize operations on the same partition
//!
//! Every operation follows the same cycle:
//! 1. Lock the partition
//! 2. Ensure root/partition/data directories and the index exist
//! 3. Load the index
//! 4. Mutate index and data
//! 5. Persist the index

mod locks;

use std::marker::PhantomData;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::{BincodeCodec, Codec};
use crate::config::Config;
use crate::error::{Result, ShelfError};
use crate::index::{OrderingKey, RecordIndex};
use crate::storage::{DirectoryManager, PartitionPaths, ResourceStore};

use locks::PartitionLocks;

/// Consistency report for one partition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionReport {
    /// Index entry count
    pub entries: usize,
    /// Distinct ids referenced by the index
    pub distinct_ids: usize,
    /// Indexed ids with no payload file
    pub missing_files: Vec<String>,
    /// Payload files no index entry references
    pub orphan_files: Vec<String>,
}

impl PartitionReport {
    /// No missing and no orphan files
    pub fn is_consistent(&self) -> bool {
        self.missing_files.is_empty() && self.orphan_files.is_empty()
    }
}

/// Partitioned, file-backed record store
///
/// `K` is the ordering key type shared by every partition of this store
/// (creation timestamps by default). `C` encodes record payloads.
///
/// ## Concurrency
/// Operations on one partition are serialized by an in-process mutex, so a
/// `FileDatabase` can be shared across threads. Several processes (or several
/// `FileDatabase` values on the same root) must not write concurrently.
pub struct FileDatabase<K = NaiveDateTime, C = BincodeCodec> {
    /// Store configuration
    config: Config,

    /// Root/partition directory handling
    directories: DirectoryManager,

    /// One mutex per partition name
    locks: PartitionLocks,

    /// Payload codec
    codec: C,

    _key: PhantomData<fn() -> K>,
}

impl<K: OrderingKey> FileDatabase<K, BincodeCodec> {
    /// Open a store rooted at `config.root_dir` with bincode payloads
    ///
    /// Creates the root directory if needed; partitions are created lazily.
    pub fn open(config: Config) -> Result<Self> {
        Self::with_codec(config, BincodeCodec)
    }

    /// Open with a root path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().root_dir(path).build())
    }
}

impl<K: OrderingKey, C: Codec> FileDatabase<K, C> {
    /// Open a store using a custom payload codec
    pub fn with_codec(config: Config, codec: C) -> Result<Self> {
        let directories = DirectoryManager::new(&config.root_dir, config.sync_writes);
        directories.ensure_root()?;

        Ok(Self {
            config,
            directories,
            locks: PartitionLocks::new(),
            codec,
            _key: PhantomData,
        })
    }

    /// Add a record, returning the partition's new entry count
    ///
    /// Steps:
    /// 1. Encode the payload
    /// 2. Insert `(key, id)` into the index (capacity check)
    /// 3. Write the payload file
    /// 4. Persist the index
    ///
    /// On `CapacityExceeded` neither the index nor the data directory is
    /// touched. Re-adding an id under a new key leaves its old index entry in
    /// place; use `edit_resource` to replace it.
    pub fn add_resource<T>(&self, partition: &str, key: K, id: &str, resource: &T) -> Result<usize>
    where
        T: Serialize + ?Sized,
    {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        let mut index = self.load_index(&paths)?;
        let store = self.resource_store(&paths);

        let payload = self.codec.encode(resource)?;
        let new_len = index.insert(key, id)?;

        store.write(id, &payload)?;
        index.store(&paths, self.config.sync_writes)?;

        debug!(partition, id, entries = new_len, "added resource");
        Ok(new_len)
    }

    /// Replace a record: drop every index entry for `id`, then add it under `key`
    ///
    /// Unlike `add_resource`, repeated edits never accumulate index entries.
    pub fn edit_resource<T>(&self, partition: &str, key: K, id: &str, resource: &T) -> Result<usize>
    where
        T: Serialize + ?Sized,
    {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        let mut index = self.load_index(&paths)?;
        let store = self.resource_store(&paths);

        let payload = self.codec.encode(resource)?;
        let replaced = index.remove_all_by_id(id);
        let new_len = index.insert(key, id)?;

        store.write(id, &payload)?;
        index.store(&paths, self.config.sync_writes)?;

        debug!(partition, id, replaced, entries = new_len, "edited resource");
        Ok(new_len)
    }

    /// Get a record by id
    ///
    /// Returns:
    /// - `Ok(Some(record))`: indexed and stored
    /// - `Ok(None)`: id not in the index
    /// - `Err(InternalInconsistency)`: indexed but the payload file is gone
    pub fn get_resource<T: DeserializeOwned>(&self, partition: &str, id: &str) -> Result<Option<T>> {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        let index = self.load_index(&paths)?;

        if !index.contains_id(id) {
            return Ok(None);
        }

        let store = self.resource_store(&paths);
        self.read_indexed(&store, partition, id).map(Some)
    }

    /// Remove a record by id. Returns `false` (and changes nothing) if absent.
    ///
    /// Removes the first index entry for `id`. The payload file is deleted
    /// once no entry references `id` any more, after the index is persisted.
    pub fn remove_resource(&self, partition: &str, id: &str) -> Result<bool> {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        let mut index = self.load_index(&paths)?;

        if !index.remove_by_id(id) {
            return Ok(false);
        }

        index.store(&paths, self.config.sync_writes)?;
        if !index.contains_id(id) {
            self.resource_store(&paths).delete(id)?;
        }

        debug!(partition, id, entries = index.len(), "removed resource");
        Ok(true)
    }

    /// Distinct record ids in ordering-key order
    pub fn get_ids_of_resources(&self, partition: &str) -> Result<Vec<String>> {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        Ok(self.load_index(&paths)?.ids())
    }

    /// Whether a record equal to `resource` is stored in the partition
    ///
    /// Linear scan: every record is read and decoded until a match is found.
    /// Fine for small partitions; avoid on hot paths.
    pub fn is_resource_present<T>(&self, partition: &str, resource: &T) -> Result<bool>
    where
        T: DeserializeOwned + PartialEq,
    {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        let index = self.load_index(&paths)?;
        let store = self.resource_store(&paths);

        for id in index.ids() {
            let candidate: T = self.read_indexed(&store, partition, &id)?;
            if candidate == *resource {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Delete a partition with its index and every record
    ///
    /// Returns `false` if it did not exist. The next operation on the
    /// partition recreates it empty.
    pub fn remove_partition(&self, partition: &str) -> Result<bool> {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        self.directories.remove_partition(partition)
    }

    /// Number of index entries in the partition
    pub fn len(&self, partition: &str) -> Result<usize> {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        Ok(self.load_index(&paths)?.len())
    }

    /// Compare the index against the data directory
    pub fn check_partition(&self, partition: &str) -> Result<PartitionReport> {
        let lock = self.locks.get(partition);
        let _guard = lock.lock();

        let paths = self.directories.ensure_partition(partition)?;
        let index = self.load_index(&paths)?;
        let store = self.resource_store(&paths);

        let ids = index.ids();
        let mut missing_files = Vec::new();
        for id in &ids {
            if !store.exists(id)? {
                missing_files.push(id.clone());
            }
        }

        let orphan_files: Vec<String> = store
            .list_ids()?
            .into_iter()
            .filter(|file| !index.contains_id(file))
            .collect();

        let report = PartitionReport {
            entries: index.len(),
            distinct_ids: ids.len(),
            missing_files,
            orphan_files,
        };

        if !report.is_consistent() {
            warn!(
                partition,
                missing = report.missing_files.len(),
                orphans = report.orphan_files.len(),
                "partition index and data directory disagree"
            );
        }
        Ok(report)
    }

    /// Names of all existing partitions, sorted
    pub fn list_partitions(&self) -> Result<Vec<String>> {
        self.directories.list_partitions()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        self.directories.root()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the on-disk layout of a partition (no I/O)
    pub fn partition_paths(&self, partition: &str) -> Result<PartitionPaths> {
        self.directories.partition_paths(partition)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn load_index(&self, paths: &PartitionPaths) -> Result<RecordIndex<K>> {
        Ok(RecordIndex::load(paths)?.with_capacity(self.config.capacity()))
    }

    fn resource_store(&self, paths: &PartitionPaths) -> ResourceStore {
        ResourceStore::new(&paths.data, self.config.sync_writes)
    }

    /// Read and decode a payload the index says must exist
    fn read_indexed<T: DeserializeOwned>(
        &self,
        store: &ResourceStore,
        partition: &str,
        id: &str,
    ) -> Result<T> {
        match store.read(id)? {
            Some(bytes) => self.codec.decode(&bytes),
            None => {
                warn!(partition, id, "indexed resource has no payload file");
                Err(ShelfError::InternalInconsistency {
                    partition: partition.to_string(),
                    id: id.to_string(),
                })
            }
        }
    }
}
