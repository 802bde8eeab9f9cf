mod clock;
mod key;
mod metrics;
mod response_cache;

pub use clock::unix_now_secs;
pub use key::CacheKey;
pub use metrics::CacheMetrics;
pub use response_cache::ResponseCache;
