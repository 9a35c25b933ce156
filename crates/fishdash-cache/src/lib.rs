//! Request/response cache with key-based invalidation.
//!
//! Cache entries are keyed by a resource family plus parameter segments.
//! Invalidation marks entries stale and triggers one background refetch per
//! entry (stale-while-revalidate); readers may keep observing the previous
//! value while the refetch is in flight. Mutations with local-state
//! prediction go through the optimistic snapshot/rollback/settle discipline.

pub mod error;
pub mod key;
pub mod optimistic;
pub mod query_cache;

pub use error::{CacheError, CacheResult};
pub use key::{QueryKey, ResourceFamily};
pub use optimistic::OptimisticSnapshot;
pub use query_cache::{CachedValue, FetchFuture, QueryCache, QueryFetcher};
