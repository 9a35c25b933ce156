//! The query cache proper: stale-while-revalidate entries, family-level
//! invalidation with coalesced background refetches, and optimistic writes.

use crate::error::CacheResult;
use crate::key::{QueryKey, ResourceFamily};
use crate::optimistic::OptimisticSnapshot;
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Future returned by a query fetcher.
pub type FetchFuture = BoxFuture<'static, CacheResult<Value>>;

/// A stored fetcher. Captures its own endpoint and parameters so an
/// invalidation can refetch the entry without knowing how it was built.
pub type QueryFetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Callback invoked with the affected key whenever a family is invalidated.
pub type InvalidateCallback = Box<dyn Fn(&QueryKey) + Send + Sync>;

struct CacheEntry {
    value: Option<Value>,
    updated_at_ms: i64,
    stale_time_ms: u64,
    stale: bool,
    refetching: bool,
    generation: u64,
    fetcher: QueryFetcher,
}

impl CacheEntry {
    fn is_fresh(&self, now_ms: i64) -> bool {
        self.value.is_some()
            && !self.stale
            && now_ms.saturating_sub(self.updated_at_ms) < self.stale_time_ms as i64
    }
}

/// A read-side view of one cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedValue {
    pub value: Value,
    pub updated_at_ms: i64,
    /// The entry has been invalidated or aged past its stale time; a
    /// refetch may be in flight. The value is still usable.
    pub is_stale: bool,
    pub is_refetching: bool,
    /// Incremented on every write to the entry. Last write wins.
    pub generation: u64,
}

/// Keyed cache over JSON responses.
///
/// Freshness is per entry: a value younger than its stale time is served
/// without touching the fetcher. Invalidation never drops data, it marks
/// entries stale and refetches in the background, so readers always see the
/// previous value until the replacement lands.
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    subscribers: RwLock<HashMap<ResourceFamily, Vec<InvalidateCallback>>>,
}

impl QueryCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: DashMap::new(),
            subscribers: RwLock::new(HashMap::new()),
        })
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Fetch through the cache. Returns the cached value when fresh,
    /// otherwise runs the fetcher and stores the result.
    ///
    /// On fetch failure any previously cached value is kept and the error is
    /// returned to the caller.
    pub async fn fetch(
        self: &Arc<Self>,
        key: QueryKey,
        stale_time_ms: u64,
        fetcher: QueryFetcher,
    ) -> CacheResult<Value> {
        let now = Self::now_ms();
        if let Some(entry) = self.entries.get(&key) {
            if entry.is_fresh(now) {
                if let Some(value) = &entry.value {
                    return Ok(value.clone());
                }
            }
        }

        let result = fetcher().await;
        match result {
            Ok(value) => {
                self.store(&key, value.clone(), stale_time_ms, fetcher);
                Ok(value)
            }
            Err(err) => {
                // Keep the stale value for readers; register the fetcher so a
                // later invalidation can still retry this entry.
                self.entries
                    .entry(key.clone())
                    .and_modify(|entry| entry.fetcher = fetcher.clone())
                    .or_insert_with(|| CacheEntry {
                        value: None,
                        updated_at_ms: 0,
                        stale_time_ms,
                        stale: true,
                        refetching: false,
                        generation: 0,
                        fetcher,
                    });
                warn!(key = %key, error = %err, "query fetch failed");
                Err(err)
            }
        }
    }

    fn store(&self, key: &QueryKey, value: Value, stale_time_ms: u64, fetcher: QueryFetcher) {
        let now = Self::now_ms();
        self.entries
            .entry(key.clone())
            .and_modify(|entry| {
                entry.value = Some(value.clone());
                entry.updated_at_ms = now;
                entry.stale_time_ms = stale_time_ms;
                entry.stale = false;
                entry.refetching = false;
                entry.generation += 1;
                entry.fetcher = fetcher.clone();
            })
            .or_insert_with(|| CacheEntry {
                value: Some(value),
                updated_at_ms: now,
                stale_time_ms,
                stale: false,
                refetching: false,
                generation: 1,
                fetcher,
            });
    }

    /// Current state of an entry, stale or not.
    pub fn get(&self, key: &QueryKey) -> Option<CachedValue> {
        let entry = self.entries.get(key)?;
        let value = entry.value.clone()?;
        let now = Self::now_ms();
        Some(CachedValue {
            value,
            updated_at_ms: entry.updated_at_ms,
            is_stale: !entry.is_fresh(now),
            is_refetching: entry.refetching,
            generation: entry.generation,
        })
    }

    /// Register a callback fired with each affected key when `family` is
    /// invalidated.
    pub fn subscribe(
        &self,
        family: ResourceFamily,
        callback: impl Fn(&QueryKey) + Send + Sync + 'static,
    ) {
        self.subscribers
            .write()
            .entry(family)
            .or_default()
            .push(Box::new(callback));
    }

    /// Invalidate every entry in a family: mark stale, kick off one
    /// background refetch per entry, and notify subscribers.
    ///
    /// Marking is synchronous; by the time this returns, no reader of an
    /// affected key sees a fresh flag. Entries already refetching are not
    /// refetched again, so a burst of invalidations coalesces into a single
    /// request per entry.
    pub fn invalidate(self: &Arc<Self>, family: ResourceFamily) {
        let keys: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|entry| entry.key().family == family)
            .map(|entry| entry.key().clone())
            .collect();
        debug!(family = %family, entries = keys.len(), "invalidating family");

        for key in &keys {
            self.invalidate_key(key);
        }

        let subscribers = self.subscribers.read();
        if let Some(callbacks) = subscribers.get(&family) {
            for key in &keys {
                for callback in callbacks {
                    callback(key);
                }
            }
        }
    }

    /// Invalidate a single entry and refetch it in the background unless a
    /// refetch is already in flight.
    pub fn invalidate_key(self: &Arc<Self>, key: &QueryKey) {
        let fetcher = {
            let Some(mut entry) = self.entries.get_mut(key) else {
                return;
            };
            entry.stale = true;
            if entry.refetching {
                return;
            }
            entry.refetching = true;
            entry.fetcher.clone()
        };

        let cache = Arc::clone(self);
        let key = key.clone();
        tokio::spawn(async move {
            match fetcher().await {
                Ok(value) => cache.complete_refetch(&key, value),
                Err(err) => {
                    warn!(key = %key, error = %err, "background refetch failed");
                    cache.fail_refetch(&key);
                }
            }
        });
    }

    fn complete_refetch(&self, key: &QueryKey, value: Value) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.value = Some(value);
            entry.updated_at_ms = Self::now_ms();
            entry.stale = false;
            entry.refetching = false;
            entry.generation += 1;
        }
    }

    fn fail_refetch(&self, key: &QueryKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            // Stays stale; the previous value remains readable.
            entry.refetching = false;
        }
    }

    /// Write a predicted value ahead of the server response, returning the
    /// snapshot needed to undo it.
    pub fn optimistic_update(&self, key: &QueryKey, predicted: Value) -> Option<OptimisticSnapshot> {
        let mut entry = self.entries.get_mut(key)?;
        let snapshot = OptimisticSnapshot {
            key: key.clone(),
            previous: entry.value.clone(),
            previous_updated_at_ms: entry.updated_at_ms,
            previous_stale: entry.stale,
        };
        entry.value = Some(predicted);
        entry.generation += 1;
        Some(snapshot)
    }

    /// Restore the exact pre-update state after a failed mutation.
    pub fn rollback(&self, snapshot: OptimisticSnapshot) {
        if let Some(mut entry) = self.entries.get_mut(&snapshot.key) {
            entry.value = snapshot.previous;
            entry.updated_at_ms = snapshot.previous_updated_at_ms;
            entry.stale = snapshot.previous_stale;
            entry.generation += 1;
        }
    }

    /// After a successful mutation: drop the prediction's authority and
    /// refetch so the cache converges on the server's view.
    pub fn settle(self: &Arc<Self>, key: &QueryKey) {
        self.invalidate_key(key);
    }

    #[cfg(test)]
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn counting_fetcher(counter: Arc<AtomicUsize>, value: Value) -> QueryFetcher {
        Arc::new(move || {
            let counter = counter.clone();
            let value = value.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        })
    }

    fn failing_fetcher() -> QueryFetcher {
        Arc::new(|| Box::pin(async { Err(CacheError::Fetch("boom".to_string())) }))
    }

    #[tokio::test]
    async fn test_fresh_value_served_without_refetch() {
        let cache = QueryCache::new();
        let key = QueryKey::of(ResourceFamily::Dashboard);
        let count = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(count.clone(), json!({"orders": 3}));

        let first = cache.fetch(key.clone(), 60_000, fetcher.clone()).await.unwrap();
        let second = cache.fetch(key.clone(), 60_000, fetcher).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let cached = cache.get(&key).unwrap();
        assert!(!cached.is_stale);
        assert_eq!(cached.generation, 1);
    }

    #[tokio::test]
    async fn test_zero_stale_time_always_refetches() {
        let cache = QueryCache::new();
        let key = QueryKey::of(ResourceFamily::System);
        let count = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(count.clone(), json!("ok"));

        cache.fetch(key.clone(), 0, fetcher.clone()).await.unwrap();
        cache.fetch(key, 0, fetcher).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let cache = QueryCache::new();
        let key = QueryKey::new(ResourceFamily::Orders, ["page=1"]);
        let count = Arc::new(AtomicUsize::new(0));

        cache
            .fetch(key.clone(), 0, counting_fetcher(count, json!([1, 2, 3])))
            .await
            .unwrap();

        let err = cache.fetch(key.clone(), 0, failing_fetcher()).await;
        assert!(err.is_err());

        // The old value is still readable, flagged stale.
        let cached = cache.get(&key).unwrap();
        assert_eq!(cached.value, json!([1, 2, 3]));
        assert!(cached.is_stale);
    }

    #[tokio::test]
    async fn test_invalidate_marks_stale_and_refetches() {
        let cache = QueryCache::new();
        let key = QueryKey::new(ResourceFamily::Orders, ["page=1"]);
        let count = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(count.clone(), json!({"total": 7}));

        cache.fetch(key.clone(), 60_000, fetcher).await.unwrap();
        cache.invalidate(ResourceFamily::Orders);

        // Stale immediately, before the background refetch lands.
        assert!(cache.get(&key).unwrap().is_stale);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
        let cached = cache.get(&key).unwrap();
        assert!(!cached.is_stale);
        assert_eq!(cached.generation, 2);
    }

    #[tokio::test]
    async fn test_invalidation_burst_coalesces_to_one_refetch() {
        let cache = QueryCache::new();
        let key = QueryKey::of(ResourceFamily::Pricing);
        let count = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let fetch_count = count.clone();
        let fetch_gate = gate.clone();
        let gated: QueryFetcher = Arc::new(move || {
            let count = fetch_count.clone();
            let gate = fetch_gate.clone();
            Box::pin(async move {
                let n = count.fetch_add(1, Ordering::SeqCst);
                if n > 0 {
                    // Refetches block until the test releases them.
                    gate.notified().await;
                }
                Ok(json!(n))
            })
        });

        cache.fetch(key.clone(), 60_000, gated).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Three invalidations while the first refetch is still in flight.
        cache.invalidate(ResourceFamily::Pricing);
        cache.invalidate(ResourceFamily::Pricing);
        cache.invalidate(ResourceFamily::Pricing);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);

        gate.notify_waiters();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!cache.get(&key).unwrap().is_stale);
    }

    #[tokio::test]
    async fn test_invalidate_only_touches_its_family() {
        let cache = QueryCache::new();
        let orders = QueryKey::of(ResourceFamily::Orders);
        let weather = QueryKey::of(ResourceFamily::Weather);
        let count = Arc::new(AtomicUsize::new(0));

        cache
            .fetch(orders.clone(), 60_000, counting_fetcher(count.clone(), json!(1)))
            .await
            .unwrap();
        cache
            .fetch(weather.clone(), 60_000, counting_fetcher(count, json!(2)))
            .await
            .unwrap();

        cache.invalidate(ResourceFamily::Orders);
        assert!(cache.get(&orders).unwrap().is_stale);
        assert!(!cache.get(&weather).unwrap().is_stale);
        assert_eq!(cache.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_notified_per_affected_key() {
        let cache = QueryCache::new();
        let key = QueryKey::new(ResourceFamily::Weather, ["days=7"]);
        let count = Arc::new(AtomicUsize::new(0));
        cache
            .fetch(key.clone(), 60_000, counting_fetcher(count, json!({})))
            .await
            .unwrap();

        let seen: Arc<parking_lot::Mutex<Vec<QueryKey>>> = Arc::default();
        let sink = seen.clone();
        cache.subscribe(ResourceFamily::Weather, move |key| {
            sink.lock().push(key.clone());
        });

        cache.invalidate(ResourceFamily::Weather);
        cache.invalidate(ResourceFamily::Orders);
        assert_eq!(seen.lock().as_slice(), &[key]);
    }

    #[tokio::test]
    async fn test_optimistic_rollback_restores_exact_state() {
        let cache = QueryCache::new();
        let key = QueryKey::of(ResourceFamily::Orders);
        let count = Arc::new(AtomicUsize::new(0));
        cache
            .fetch(key.clone(), 60_000, counting_fetcher(count, json!({"orders": [1]})))
            .await
            .unwrap();
        let before = cache.get(&key).unwrap();

        let snapshot = cache
            .optimistic_update(&key, json!({"orders": [1, 2]}))
            .unwrap();
        assert_eq!(cache.get(&key).unwrap().value, json!({"orders": [1, 2]}));

        cache.rollback(snapshot);
        let after = cache.get(&key).unwrap();
        assert_eq!(after.value, before.value);
        assert_eq!(after.updated_at_ms, before.updated_at_ms);
        assert_eq!(after.is_stale, before.is_stale);
        // The rollback itself is a write.
        assert!(after.generation > before.generation);
    }

    #[tokio::test]
    async fn test_settle_refetches_authoritative_value() {
        let cache = QueryCache::new();
        let key = QueryKey::of(ResourceFamily::Orders);
        let count = Arc::new(AtomicUsize::new(0));
        cache
            .fetch(key.clone(), 60_000, counting_fetcher(count.clone(), json!("server")))
            .await
            .unwrap();

        cache.optimistic_update(&key, json!("predicted")).unwrap();
        cache.settle(&key);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&key).unwrap().value, json!("server"));
    }

    #[tokio::test]
    async fn test_optimistic_update_on_missing_entry_is_none() {
        let cache = QueryCache::new();
        let key = QueryKey::of(ResourceFamily::Blog);
        assert!(cache.optimistic_update(&key, json!(1)).is_none());
    }
}
