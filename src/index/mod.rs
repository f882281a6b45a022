//! Index Module
//!
//! The per-partition record index: a sorted mapping from an ordering key
//! (usually a creation timestamp) to a record id.
//!
//! ## File Format (`record.idx`)
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "SHDX" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (variable)                                      │
//! │   bincode(Vec<(K, String)>), ascending by K             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                        │
//! │   PayloadCRC: u32                                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers little-endian.

mod record_index;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use record_index::RecordIndex;

use crate::error::Result;
use crate::storage::PartitionPaths;

// =============================================================================
// Shared Constants
// =============================================================================

/// Hard per-partition entry limit
pub const MAX_ENTRIES: usize = 1_000_000;

/// Magic bytes identifying a ShelfDB index file
pub(crate) const MAGIC: &[u8; 4] = b"SHDX";

/// Current index format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8) = 14 bytes
pub(crate) const HEADER_SIZE: usize = 14;

/// Footer size: PayloadCRC (4) = 4 bytes
pub(crate) const FOOTER_SIZE: usize = 4;

/// Types usable as ordering keys
///
/// Blanket-implemented for anything totally ordered and serde-serializable,
/// e.g. `chrono::NaiveDateTime`, integers, strings.
pub trait OrderingKey: Ord + Serialize + DeserializeOwned {}

impl<T: Ord + Serialize + DeserializeOwned> OrderingKey for T {}

/// Persist an empty index for a freshly created partition
///
/// An empty payload encodes identically for every key type.
pub(crate) fn create_empty(paths: &PartitionPaths, sync: bool) -> Result<()> {
    RecordIndex::<()>::new(&paths.name).store(paths, sync)
}
