use ferrous_resolver_application::use_cases::{DispatchOutcome, HandleDnsQueryUseCase};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns one inbound datagram into the bytes to send back, if any.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Returns `None` when nothing should be sent: the datagram was not a
    /// usable query, or resolution failed with SERVFAIL replies disabled.
    pub async fn handle_datagram(&self, raw: &[u8], client: SocketAddr) -> Option<DispatchOutcome> {
        match self.use_case.execute(raw, client).await {
            Ok(outcome) if outcome.response().is_some() => Some(outcome),
            Ok(_) => {
                debug!(client = %client, "Resolution failed, dropping query");
                None
            }
            Err(e) if e.is_malformed_input() => {
                warn!(client = %client, len = raw.len(), error = %e, "Dropping malformed query");
                None
            }
            Err(e) => {
                error!(client = %client, error = %e, "Failed to build a reply");
                None
            }
        }
    }
}
