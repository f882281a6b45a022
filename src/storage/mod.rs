//! Storage Module
//!
//! On-disk layout of a ShelfDB root: partition directories and the record
//! files inside them.
//!
//! ## Responsibilities
//! - Create the root, partition and data directories on demand
//! - Delete a partition bottom-up
//! - Read, write and delete one record file per id
//!
//! ## Directory Layout
//! ```text
//! <root>/
//! └── <partition>/
//!     ├── record.idx        sorted (ordering key → id) index
//!     └── data/
//!         └── <id>          one opaque payload per record
//! ```

mod atomic;
mod directory;
mod resource;

pub use directory::{DirectoryManager, PartitionPaths};
pub use resource::ResourceStore;

pub(crate) use atomic::{atomic_write, write_file};

/// Whether `name` can be used as a single path component
///
/// Rejects empty names, `.`/`..`, and anything containing a separator or NUL.
pub(crate) fn is_valid_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\', '\0'][..])
}
