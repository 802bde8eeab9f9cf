mod dns_resolver;
mod response_cache_port;

pub use dns_resolver::RecursiveResolver;
pub use response_cache_port::{CacheMetricsSnapshot, ResponseCachePort};

// Re-export for convenience
pub use ferrous_resolver_domain::DnsQuery;
