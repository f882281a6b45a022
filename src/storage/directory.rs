//! Directory Manager
//!
//! Guarantees the root/partition/data directory structure exists and owns
//! partition deletion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, ShelfError};
use crate::index;

use super::is_valid_component;

/// Paths making up one partition on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPaths {
    /// Partition name (a single path component)
    pub name: String,
    /// `<root>/<name>`
    pub dir: PathBuf,
    /// `<root>/<name>/record.idx`
    pub index: PathBuf,
    /// `<root>/<name>/data`
    pub data: PathBuf,
}

/// Creates and removes partition directories under one root
///
/// Never deletes anything except through `remove_partition`.
#[derive(Debug, Clone)]
pub struct DirectoryManager {
    root: PathBuf,
    sync_writes: bool,
}

impl DirectoryManager {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    pub const INDEX_FILENAME: &'static str = "record.idx";
    pub const DATA_DIR: &'static str = "data";

    pub fn new(root: impl Into<PathBuf>, sync_writes: bool) -> Self {
        Self {
            root: root.into(),
            sync_writes,
        }
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the layout of a partition (no I/O)
    pub fn partition_paths(&self, name: &str) -> Result<PartitionPaths> {
        if !is_valid_component(name) {
            return Err(ShelfError::InvalidPartitionName(name.to_string()));
        }

        let dir = self.root.join(name);
        Ok(PartitionPaths {
            name: name.to_string(),
            index: dir.join(Self::INDEX_FILENAME),
            data: dir.join(Self::DATA_DIR),
            dir,
        })
    }

    /// Make sure the root directory exists, creating it (and parents) if needed
    pub fn ensure_root(&self) -> Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(&self.root).map_err(|source| ShelfError::RootNotFound {
            path: self.root.clone(),
            source,
        })?;

        info!(root = %self.root.display(), "created root directory");
        Ok(())
    }

    /// Make sure a partition, its data directory and its index exist
    ///
    /// Each step is idempotent; an existing index is left untouched.
    pub fn ensure_partition(&self, name: &str) -> Result<PartitionPaths> {
        let paths = self.partition_paths(name)?;
        self.ensure_root()?;

        let created = Self::create_dir(&paths.dir)?;
        Self::create_dir(&paths.data)?;

        if !paths.index.exists() {
            index::create_empty(&paths, self.sync_writes)?;
        }

        if created {
            info!(partition = name, "created partition");
        }
        Ok(paths)
    }

    /// Delete a partition and everything in it
    ///
    /// Depth-first walk with an explicit stack: files go first, each
    /// directory is removed once its children are gone. Returns `false` if
    /// the partition did not exist.
    pub fn remove_partition(&self, name: &str) -> Result<bool> {
        let paths = self.partition_paths(name)?;
        if !paths.dir.exists() {
            return Ok(false);
        }

        // (path, children already removed)
        let mut stack: Vec<(PathBuf, bool)> = vec![(paths.dir.clone(), false)];

        while let Some((dir, drained)) = stack.pop() {
            if drained {
                fs::remove_dir(&dir)?;
                continue;
            }

            stack.push((dir.clone(), true));
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if entry.file_type()?.is_dir() {
                    stack.push((entry.path(), false));
                } else {
                    fs::remove_file(entry.path())?;
                }
            }
        }

        info!(partition = name, "removed partition");
        Ok(true)
    }

    /// Names of all partitions under the root, sorted
    ///
    /// A partition is a directory holding an index file.
    pub fn list_partitions(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if !entry.path().join(Self::INDEX_FILENAME).is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Create a single directory. Returns `true` if it was newly created.
    fn create_dir(path: &Path) -> Result<bool> {
        if path.is_dir() {
            return Ok(false);
        }

        match fs::create_dir(path) {
            Ok(()) => {
                debug!(path = %path.display(), "created directory");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
            Err(source) => Err(ShelfError::CannotCreateDirectory {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
