//! Snapshot taken before an optimistic cache write.
//!
//! Holds the exact prior state of the entry so a failed mutation can restore
//! it byte for byte. Created by [`QueryCache::optimistic_update`] and
//! consumed by `rollback`.
//!
//! [`QueryCache::optimistic_update`]: crate::QueryCache::optimistic_update

use crate::key::QueryKey;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct OptimisticSnapshot {
    pub(crate) key: QueryKey,
    pub(crate) previous: Option<Value>,
    pub(crate) previous_updated_at_ms: i64,
    pub(crate) previous_stale: bool,
}

impl OptimisticSnapshot {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// The value that was cached before the optimistic write, if any.
    pub fn previous(&self) -> Option<&Value> {
        self.previous.as_ref()
    }
}
