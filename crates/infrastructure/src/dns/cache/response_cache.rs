use super::clock::unix_now_secs;
use super::key::CacheKey;
use super::metrics::CacheMetrics;
use ferrous_resolver_application::ports::{CacheMetricsSnapshot, ResponseCachePort};
use ferrous_resolver_domain::wire::min_ttl;
use ferrous_resolver_domain::{Question, Record};
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

struct CacheEntry {
    response: Arc<[u8]>,
    stored_at: u64,
    ttl: u32,
}

impl CacheEntry {
    #[inline]
    fn is_fresh(&self, now: u64) -> bool {
        self.stored_at + u64::from(self.ttl) > now
    }
}

/// TTL-bounded store of complete responses.
///
/// One mutex guards the map; it is held only for a single check-or-update
/// and never across an await point. Expired entries are removed lazily when
/// a lookup finds them. Beyond `max_entries` the least recently used entry
/// is evicted.
pub struct ResponseCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry, FxBuildHasher>>,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        info!(max_entries = capacity.get(), "Response cache initialized");

        Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            metrics: CacheMetrics::default(),
        }
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<Arc<[u8]>> {
        self.lookup_at(key, unix_now_secs())
    }

    /// Lookup against an explicit clock, in seconds since the UNIX epoch.
    pub fn lookup_at(&self, key: &CacheKey, now: u64) -> Option<Arc<[u8]>> {
        let mut entries = self.lock();

        let expired = match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                CacheMetrics::record(&self.metrics.hits);
                return Some(Arc::clone(&entry.response));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            CacheMetrics::record(&self.metrics.expirations);
            debug!(key = %key, "Expired cache entry removed");
        }
        CacheMetrics::record(&self.metrics.misses);
        None
    }

    pub fn store(&self, key: CacheKey, response: Arc<[u8]>, answers: &[Record]) -> bool {
        self.store_at(key, response, answers, unix_now_secs())
    }

    /// Stores `response` under `key` for the smallest TTL in `answers`.
    ///
    /// Nothing is stored when `answers` is empty or its smallest TTL is zero.
    /// Returns whether an entry was written.
    pub fn store_at(
        &self,
        key: CacheKey,
        response: Arc<[u8]>,
        answers: &[Record],
        now: u64,
    ) -> bool {
        let ttl = match min_ttl(answers) {
            Some(ttl) if ttl > 0 => ttl,
            _ => return false,
        };

        let entry = CacheEntry {
            response,
            stored_at: now,
            ttl,
        };

        let mut entries = self.lock();
        if entries.len() == entries.cap().get() && !entries.contains(&key) {
            CacheMetrics::record(&self.metrics.evictions);
        }
        debug!(key = %key, ttl, "Caching response");
        entries.put(key, entry);
        CacheMetrics::record(&self.metrics.insertions);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        info!(count, "Response cache cleared");
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry, FxBuildHasher>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResponseCachePort for ResponseCache {
    fn lookup(&self, question: &Question) -> Option<Arc<[u8]>> {
        ResponseCache::lookup(self, &CacheKey::from_question(question))
    }

    fn store(&self, question: &Question, response: Arc<[u8]>, answers: &[Record]) {
        ResponseCache::store(self, CacheKey::from_question(question), response, answers);
    }

    fn len(&self) -> usize {
        ResponseCache::len(self)
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(ResponseCache::len(self))
    }
}
