//! Configuration for ShelfDB
//!
//! Centralized configuration with sensible defaults, plus the line-based
//! `database.config` file that names the root directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShelfError};
use crate::index::MAX_ENTRIES;

/// Main configuration for a ShelfDB instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all partitions
    /// Internal structure:
    ///   {root_dir}/
    ///     └── {partition}/
    ///           ├── record.idx   (sorted ordering key → id index)
    ///           └── data/        (one file per record)
    pub root_dir: PathBuf,

    /// fsync resource and index files before an operation returns
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Max entries per partition. Clamped to `MAX_ENTRIES`.
    pub partition_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./shelfdb_data"),
            sync_writes: false,
            partition_capacity: MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a config whose root comes from a `database.config` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = ConfigFile::load(path)?;
        Ok(Self::builder().root_dir(file.root_path()?).build())
    }

    /// Effective per-partition capacity
    pub fn capacity(&self) -> usize {
        self.partition_capacity.min(MAX_ENTRIES)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory (parent of all partitions)
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Enable or disable fsync after writes
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Lower the per-partition capacity (values above `MAX_ENTRIES` are clamped)
    pub fn partition_capacity(mut self, capacity: usize) -> Self {
        self.config.partition_capacity = capacity.min(MAX_ENTRIES);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

// =============================================================================
// database.config
// =============================================================================

/// Parsed `database.config` file
///
/// Format:
/// - every line is trimmed
/// - lines starting with `#` are ignored
/// - an entry is a line that splits on `=` into exactly two non-empty parts
/// - keys and values are trimmed; the first occurrence of a key wins
/// - the `root` key holds the root directory path
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    entries: Vec<(String, String)>,
}

impl ConfigFile {
    /// Default file name, looked up relative to the working directory
    pub const DEFAULT_FILE_NAME: &'static str = "database.config";

    /// Key holding the root directory path
    pub const ROOT_KEY: &'static str = "root";

    const TEMPLATE: &'static str = "\
# Structure of the database.config file:
#   Every key and its value is separated by a '='
#   Every key value pair is separated by a line terminator
#   \"root\" key represents root database directory
#   \"root\" key's value represents its directory path
#   Lines starting with '#' are ignored
";

    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ShelfError::Config(format!("cannot read config file {:?}: {}", path, e))
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();

        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split('=').collect();
            if parts.len() != 2 {
                continue;
            }

            let key = parts[0].trim();
            let value = parts[1].trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }

            if !entries.iter().any(|(k, _)| k == key) {
                entries.push((key.to_string(), value.to_string()));
            }
        }

        Self { entries }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The configured root directory
    pub fn root_path(&self) -> Result<PathBuf> {
        self.get(Self::ROOT_KEY).map(PathBuf::from).ok_or_else(|| {
            ShelfError::Config("cannot find root directory path in config file".to_string())
        })
    }

    /// All entries in file order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write a commented template (no entries) to `path`, replacing any file there
    pub fn write_template(path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, Self::TEMPLATE)?;
        Ok(())
    }

    /// Write a template followed by a `root = <dir>` entry
    pub fn write_with_root(path: impl AsRef<Path>, root: impl AsRef<Path>) -> Result<()> {
        let contents = format!(
            "{}{} = {}\n",
            Self::TEMPLATE,
            Self::ROOT_KEY,
            root.as_ref().display()
        );
        fs::write(path, contents)?;
        Ok(())
    }
}
