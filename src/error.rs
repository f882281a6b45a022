//! Error types for ShelfDB
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Unified error type for ShelfDB operations
///
/// "Not found" is never an error: lookups return `Option`, and removals of
/// absent records or partitions succeed silently.
#[derive(Debug, Error)]
pub enum ShelfError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Directory Structure Errors
    // -------------------------------------------------------------------------
    #[error("Root directory {path:?} does not exist and could not be created: {source}")]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create directory {path:?}: {source}")]
    CannotCreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid partition name: {0:?}")]
    InvalidPartitionName(String),

    #[error("Invalid resource id: {0:?}")]
    InvalidResourceId(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Partition '{partition}' is full ({capacity} entries)")]
    CapacityExceeded { partition: String, capacity: usize },

    #[error("Index corrupted at {path:?}: {reason}")]
    IndexCorrupted { path: PathBuf, reason: String },

    #[error("Internal inconsistency in partition '{partition}': id {id} is indexed but has no resource file")]
    InternalInconsistency { partition: String, id: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Entity List Errors
    // -------------------------------------------------------------------------
    #[error("Record {id} already exists in partition '{partition}'")]
    DuplicateRecord { partition: String, id: String },
}

impl From<bincode::Error> for ShelfError {
    fn from(err: bincode::Error) -> Self {
        ShelfError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        ShelfError::Serialization(err.to_string())
    }
}
