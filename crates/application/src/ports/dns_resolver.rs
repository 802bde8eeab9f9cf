use async_trait::async_trait;
use ferrous_resolver_domain::{DnsQuery, DomainError};
use std::sync::Arc;

#[async_trait]
pub trait RecursiveResolver: Send + Sync {
    /// Resolves `query` and returns the raw final response.
    ///
    /// When `query.id` is set the response carries that transaction id, so
    /// it can be handed back to the client unchanged.
    async fn resolve(&self, query: &DnsQuery) -> Result<Arc<[u8]>, DomainError>;
}
