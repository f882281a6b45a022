//! Per-partition locks
//!
//! Every facade operation is a full load → mutate → store cycle on the
//! partition's index. Holding the partition's mutex for the whole cycle keeps
//! concurrent callers in one process from losing each other's updates.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Lock table keyed by partition name
#[derive(Debug, Default)]
pub(crate) struct PartitionLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PartitionLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the mutex guarding `partition`
    ///
    /// Callers lock the returned mutex for the duration of one operation.
    pub(crate) fn get(&self, partition: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(
            locks
                .entry(partition.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}
