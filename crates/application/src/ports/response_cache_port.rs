use ferrous_resolver_domain::{Question, Record};
use std::sync::Arc;

/// Snapshot of response cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub expirations: u64,
    pub evictions: u64,
}

impl CacheMetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// Shared store of complete responses keyed by question.
///
/// Implementations serialize every check-or-update internally, so callers
/// may share one instance across any number of tasks.
pub trait ResponseCachePort: Send + Sync {
    /// Returns the stored response for `question` if it is still fresh.
    fn lookup(&self, question: &Question) -> Option<Arc<[u8]>>;

    /// Stores `response` for `question`, living as long as the smallest TTL
    /// in `answers`. Responses without answers are not stored.
    fn store(&self, question: &Question, response: Arc<[u8]>, answers: &[Record]);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot;
}
