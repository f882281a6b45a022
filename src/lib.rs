//! # ShelfDB
//!
//! A partitioned, file-backed record store:
//! - One directory per partition, one file per record
//! - A sorted (ordering key → id) index per partition
//! - Hard capacity of 1,000,000 entries per partition
//! - Lazily created partitions, recursive partition deletion
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              EntityList<T: Record> (optional)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   FileDatabase facade                        │
//! │          (per-partition lock, load → mutate → store)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!        ┌──────────────┼──────────────────┐
//!        │              │                  │
//!        ▼              ▼                  ▼
//! ┌─────────────┐ ┌─────────────┐  ┌───────────────┐
//! │  Directory  │ │ RecordIndex │  │ ResourceStore │
//! │  Manager    │ │ (record.idx)│  │   (data/<id>) │
//! └─────────────┘ └─────────────┘  └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod storage;
pub mod index;
pub mod database;
pub mod record;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, ShelfError};
pub use config::{Config, ConfigFile};
pub use codec::{BincodeCodec, Codec, JsonCodec};
pub use database::{FileDatabase, PartitionReport};
pub use index::{OrderingKey, RecordIndex, MAX_ENTRIES};
pub use record::{EntityList, PartitionName, Record};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShelfDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
