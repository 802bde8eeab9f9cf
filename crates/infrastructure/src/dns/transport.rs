pub mod udp;
pub mod udp_pool;

use async_trait::async_trait;
use ferrous_resolver_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

pub use udp::UdpTransport;
pub use udp_pool::{PoolStats, PooledUdpSocket, UdpSocketPool};

/// One query/response round trip with a nameserver.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends `query` to `server` and returns the matching response bytes.
    ///
    /// Fails with a timeout error when no matching response arrives within
    /// `timeout`. No retries.
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
