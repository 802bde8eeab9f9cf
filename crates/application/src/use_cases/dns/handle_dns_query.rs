use crate::ports::{RecursiveResolver, ResponseCachePort};
use ferrous_resolver_domain::wire::{rewrite_id, RCODE_NOTIMP};
use ferrous_resolver_domain::{DnsQuery, DomainError, Packet, RecordClass};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// What the server should do with one inbound query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Served from the cache; the transaction id is already the client's.
    Cached(Vec<u8>),
    /// Freshly resolved response, carrying the client's transaction id.
    Resolved(Arc<[u8]>),
    /// The query was not answered. `reply` holds NOTIMP for a class other
    /// than IN, and for a failed resolution a SERVFAIL response when the
    /// server is configured to answer failures, `None` when it is dropped.
    Failed {
        error: DomainError,
        reply: Option<Vec<u8>>,
    },
}

impl DispatchOutcome {
    /// Bytes to send back to the client, if any.
    pub fn response(&self) -> Option<&[u8]> {
        match self {
            DispatchOutcome::Cached(bytes) => Some(bytes),
            DispatchOutcome::Resolved(bytes) => Some(bytes),
            DispatchOutcome::Failed { reply, .. } => reply.as_deref(),
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, DispatchOutcome::Cached(_))
    }
}

pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn RecursiveResolver>,
    cache: Option<Arc<dyn ResponseCachePort>>,
    servfail_on_failure: bool,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn RecursiveResolver>) -> Self {
        Self {
            resolver,
            cache: None,
            servfail_on_failure: true,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCachePort>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_servfail_on_failure(mut self, enabled: bool) -> Self {
        self.servfail_on_failure = enabled;
        self
    }

    /// Answers one raw query datagram.
    ///
    /// Returns `Err` only for input that must not be answered at all: bytes
    /// that do not decode, a message without a question, or a response.
    pub async fn execute(
        &self,
        raw: &[u8],
        client: SocketAddr,
    ) -> Result<DispatchOutcome, DomainError> {
        let start = Instant::now();

        let request = Packet::decode(raw)?;
        if request.header.is_response() {
            return Err(DomainError::UnexpectedResponse);
        }
        let question = request.first_question().ok_or(DomainError::NoQuestion)?;
        let client_id = request.header.id;

        // Resolution and caching only handle the Internet class.
        if question.qclass != RecordClass::IN {
            debug!(
                domain = %question.name,
                class = %question.qclass,
                client = %client,
                "Unsupported class, answering NOTIMP"
            );
            return Ok(DispatchOutcome::Failed {
                error: DomainError::UnsupportedClass(question.qclass.to_u16()),
                reply: Some(Packet::error_reply(&request, RCODE_NOTIMP).encode()?),
            });
        }

        if let Some(cache) = &self.cache {
            if let Some(stored) = cache.lookup(question) {
                let mut reply = stored.to_vec();
                rewrite_id(&mut reply, client_id);
                debug!(
                    domain = %question.name,
                    record_type = %question.qtype,
                    client = %client,
                    "Cache hit"
                );
                return Ok(DispatchOutcome::Cached(reply));
            }
        }

        let query = DnsQuery::new(question.name.as_str(), question.qtype).with_id(client_id);

        match self.resolver.resolve(&query).await {
            Ok(response) => {
                if let Some(cache) = &self.cache {
                    match Packet::decode(&response) {
                        Ok(packet) => cache.store(question, Arc::clone(&response), &packet.answers),
                        Err(e) => {
                            warn!(error = %e, domain = %question.name, "Resolved response does not decode, not caching")
                        }
                    }
                }

                debug!(
                    domain = %question.name,
                    record_type = %question.qtype,
                    client = %client,
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Resolved"
                );
                Ok(DispatchOutcome::Resolved(response))
            }
            Err(error) => {
                warn!(
                    error = %error,
                    domain = %question.name,
                    record_type = %question.qtype,
                    client = %client,
                    "Resolution failed"
                );

                let reply = if self.servfail_on_failure {
                    Some(Packet::servfail_for(&request).encode()?)
                } else {
                    None
                };
                Ok(DispatchOutcome::Failed { error, reply })
            }
        }
    }
}
