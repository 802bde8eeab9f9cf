use super::IterativeConfig;
use crate::dns::transport::DnsTransport;
use async_trait::async_trait;
use ferrous_resolver_application::ports::RecursiveResolver;
use ferrous_resolver_domain::wire::{
    build_query_with_id, names_equal, QueryMode, RCODE_NOERROR, RCODE_NXDOMAIN,
};
use ferrous_resolver_domain::{DnsQuery, DomainError, Packet, RecordType};
use futures::future::{BoxFuture, FutureExt};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, info};

/// What a nameserver response tells the resolver to do next.
#[derive(Debug, PartialEq, Eq)]
enum NextStep {
    /// The response is final and goes back to the client.
    Final,
    /// Ask the nameserver at this glue address.
    Referral(Ipv4Addr),
    /// A nameserver was named without glue; its address must be resolved.
    ResolveNameserver(String),
    /// Neither an answer nor anything to follow.
    DeadEnd,
}

fn next_step(response: &Packet, name: &str, record_type: RecordType) -> NextStep {
    match response.header.rcode() {
        RCODE_NXDOMAIN => return NextStep::Final,
        RCODE_NOERROR => {}
        _ => return NextStep::DeadEnd,
    }

    if response.has_answer_for(name, record_type) {
        return NextStep::Final;
    }

    let referral = response.referral_nameserver();
    if response.header.is_authoritative()
        && (referral.is_none() || response.answers.iter().any(|r| names_equal(&r.name, name)))
    {
        return NextStep::Final;
    }

    if let Some(glue) = response.glue_address() {
        return NextStep::Referral(glue);
    }

    match referral {
        Some(nameserver) => NextStep::ResolveNameserver(nameserver.to_string()),
        None => NextStep::DeadEnd,
    }
}

/// Round trips left for one resolution, shared with nested nameserver
/// lookups.
struct HopBudget {
    max: usize,
    used: usize,
}

impl HopBudget {
    fn new(max: usize) -> Self {
        Self { max, used: 0 }
    }

    fn spend(&mut self) -> Result<usize, DomainError> {
        if self.used >= self.max {
            return Err(DomainError::DelegationTooDeep(self.max));
        }
        self.used += 1;
        Ok(self.used)
    }
}

/// Walks the delegation chain from the root, one round trip per hop.
///
/// Every hop queries with RD clear and follows referrals: glue addresses
/// first, otherwise a nested resolution of the nameserver's name. The
/// resolver holds no shared mutable state.
pub struct IterativeResolver {
    transport: Arc<dyn DnsTransport>,
    config: IterativeConfig,
}

impl IterativeResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, config: IterativeConfig) -> Self {
        info!(
            root_server = %config.root_server,
            protocol = transport.protocol_name(),
            timeout_ms = config.query_timeout.as_millis() as u64,
            max_hops = config.max_hops,
            "Iterative resolver created"
        );

        Self { transport, config }
    }

    pub fn config(&self) -> &IterativeConfig {
        &self.config
    }

    /// Resolves `name`/`record_type` starting at the root server.
    ///
    /// Every hop reuses `id` when given, so the final response already
    /// carries it. Returns the raw bytes of the final response.
    pub async fn resolve_name(
        &self,
        name: &str,
        record_type: RecordType,
        id: Option<u16>,
    ) -> Result<Vec<u8>, DomainError> {
        let mut budget = HopBudget::new(self.config.max_hops);
        let resolution = self.resolve_from_root(name, record_type, id, 0, &mut budget);

        match self.config.resolution_timeout {
            Some(limit) => tokio::time::timeout(limit, resolution)
                .await
                .map_err(|_| DomainError::QueryTimeout)?,
            None => resolution.await,
        }
    }

    fn resolve_from_root<'a>(
        &'a self,
        name: &'a str,
        record_type: RecordType,
        id: Option<u16>,
        ns_depth: usize,
        budget: &'a mut HopBudget,
    ) -> BoxFuture<'a, Result<Vec<u8>, DomainError>> {
        async move {
            let query_id = id.unwrap_or_else(|| fastrand::u16(..));
            let query = build_query_with_id(query_id, name, record_type, QueryMode::Iterative)?;
            let mut server = self.config.root_server;

            loop {
                let hop = budget.spend()?;
                debug!(
                    domain = %name,
                    record_type = %record_type,
                    server = %server,
                    hop,
                    ns_depth,
                    "Querying nameserver"
                );

                let bytes = self
                    .transport
                    .exchange(server, &query, self.config.query_timeout)
                    .await?;
                let response = Packet::decode(&bytes)?;
                if response.header.id != query_id {
                    return Err(DomainError::ResponseIdMismatch {
                        expected: query_id,
                        received: response.header.id,
                    });
                }

                match next_step(&response, name, record_type) {
                    NextStep::Final => {
                        debug!(
                            domain = %name,
                            server = %server,
                            rcode = response.header.rcode(),
                            answers = response.answers.len(),
                            hops = hop,
                            "Resolution finished"
                        );
                        return Ok(bytes);
                    }
                    NextStep::Referral(glue) => {
                        server = SocketAddr::new(IpAddr::V4(glue), self.config.nameserver_port);
                    }
                    NextStep::ResolveNameserver(nameserver) => {
                        let address = self
                            .resolve_nameserver(&nameserver, ns_depth, &mut *budget)
                            .await?;
                        server = SocketAddr::new(IpAddr::V4(address), self.config.nameserver_port);
                    }
                    NextStep::DeadEnd => {
                        return Err(DomainError::NoUsableReferral {
                            server: server.to_string(),
                        });
                    }
                }
            }
        }
        .boxed()
    }

    async fn resolve_nameserver(
        &self,
        nameserver: &str,
        ns_depth: usize,
        budget: &mut HopBudget,
    ) -> Result<Ipv4Addr, DomainError> {
        if ns_depth >= self.config.max_ns_depth {
            debug!(nameserver = %nameserver, ns_depth, "Nameserver lookup nested too deep");
            return Err(DomainError::NameserverUnresolvable(nameserver.to_string()));
        }

        debug!(nameserver = %nameserver, "Referral without glue, resolving nameserver");
        let bytes = match self
            .resolve_from_root(nameserver, RecordType::A, None, ns_depth + 1, budget)
            .await
        {
            Ok(bytes) => bytes,
            Err(e @ DomainError::DelegationTooDeep(_)) => return Err(e),
            Err(e) => {
                debug!(nameserver = %nameserver, error = %e, "Nameserver lookup failed");
                return Err(DomainError::NameserverUnresolvable(nameserver.to_string()));
            }
        };

        Packet::decode(&bytes)?
            .answers_for(nameserver, RecordType::A)
            .find_map(|record| record.data.as_address())
            .ok_or_else(|| DomainError::NameserverUnresolvable(nameserver.to_string()))
    }
}

#[async_trait]
impl RecursiveResolver for IterativeResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<Arc<[u8]>, DomainError> {
        let bytes = self
            .resolve_name(&query.domain, query.record_type, query.id)
            .await?;
        Ok(Arc::from(bytes))
    }
}
