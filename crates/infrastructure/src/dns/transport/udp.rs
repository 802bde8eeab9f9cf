//! UDP transport for nameserver queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is, without framing. Responses from other sources
//! or carrying another transaction id are ignored until the deadline, so a
//! late answer left on a reused socket cannot be mistaken for this one.

use super::{DnsTransport, UdpSocketPool};
use async_trait::async_trait;
use ferrous_resolver_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Largest datagram accepted from a nameserver.
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    pool: Arc<UdpSocketPool>,
}

impl UdpTransport {
    pub fn new(pool: Arc<UdpSocketPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<UdpSocketPool> {
        &self.pool
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let query_id = transaction_id(query).ok_or_else(|| {
            DomainError::InvalidDnsResponse("query shorter than a transaction id".to_string())
        })?;
        let deadline = Instant::now() + timeout;

        let pooled = tokio::time::timeout_at(deadline, self.pool.acquire(server))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| DomainError::IoError(format!("Failed to open UDP socket: {}", e)))?;
        let socket = pooled.socket();

        let bytes_sent = socket.send_to(query, server).await.map_err(|e| {
            DomainError::IoError(format!("Failed to send UDP query to {}: {}", server, e))
        })?;
        debug!(server = %server, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| DomainError::TransportTimeout {
                        server: server.to_string(),
                    })?
                    .map_err(|e| {
                        DomainError::IoError(format!(
                            "Failed to receive UDP response from {}: {}",
                            server, e
                        ))
                    })?;

            if from_addr != server {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    "UDP response from unexpected source, ignoring"
                );
                continue;
            }

            if let Err(e) = validate_response_id(query_id, &recv_buf[..bytes_received]) {
                debug!(server = %server, error = %e, "Ignoring stale UDP response");
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %server, bytes_received, "UDP response received");
            return Ok(recv_buf);
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

fn transaction_id(message: &[u8]) -> Option<u16> {
    match message {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

/// Checks that `response` answers the query with transaction id `query_id`.
pub fn validate_response_id(query_id: u16, response: &[u8]) -> Result<(), DomainError> {
    let received = transaction_id(response).ok_or_else(|| {
        DomainError::InvalidDnsResponse("response shorter than a transaction id".to_string())
    })?;
    if received != query_id {
        return Err(DomainError::ResponseIdMismatch {
            expected: query_id,
            received,
        });
    }
    Ok(())
}
