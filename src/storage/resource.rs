//! Resource Store
//!
//! One file per record inside a partition's data directory. Payloads are
//! opaque bytes; encoding belongs to the caller's codec.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{Result, ShelfError};

use super::{is_valid_component, write_file};

/// Reads and writes record payloads for one partition
#[derive(Debug, Clone)]
pub struct ResourceStore {
    data_dir: PathBuf,
    sync_writes: bool,
}

impl ResourceStore {
    pub fn new(data_dir: impl Into<PathBuf>, sync_writes: bool) -> Self {
        Self {
            data_dir: data_dir.into(),
            sync_writes,
        }
    }

    /// Create or overwrite the payload for `id`
    pub fn write(&self, id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(id)?;
        write_file(&path, bytes, self.sync_writes)
    }

    /// Read the payload for `id`
    ///
    /// Returns:
    /// - `Ok(Some(bytes))`: file present
    /// - `Ok(None)`: no file for this id
    pub fn read(&self, id: &str) -> Result<Option<Bytes>> {
        let path = self.path_for(id)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the payload for `id`. Returns `false` if it was already absent.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a payload file exists for `id`
    pub fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.path_for(id)?.is_file())
    }

    /// Ids of every payload file in the data directory, sorted
    pub fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_component(id) {
            return Err(ShelfError::InvalidResourceId(id.to_string()));
        }
        Ok(self.data_dir.join(id))
    }
}
