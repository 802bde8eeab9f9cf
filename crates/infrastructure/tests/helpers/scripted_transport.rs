use async_trait::async_trait;
use ferrous_resolver_domain::wire::{names_equal, FLAG_AA, FLAG_QR, RCODE_NXDOMAIN};
use ferrous_resolver_domain::{DomainError, Header, Packet, Record, RecordType};
use ferrous_resolver_infrastructure::dns::transport::DnsTransport;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

pub const ROOT: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1)),
    53,
);

pub fn ns_addr(ip: [u8; 4]) -> SocketAddr {
    SocketAddr::from((ip, 53))
}

struct Rule {
    server: SocketAddr,
    /// `None` matches any question name.
    name: Option<String>,
    template: Packet,
    id_override: Option<u16>,
}

/// In-memory nameservers answering from canned templates.
///
/// The reply echoes the query id and question and sets QR. Servers without a
/// matching rule time out.
#[derive(Default)]
pub struct ScriptedTransport {
    rules: Mutex<Vec<Rule>>,
    queries: Mutex<Vec<(SocketAddr, String, RecordType)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, server: SocketAddr, name: Option<&str>, template: Packet, id_override: Option<u16>) {
        self.rules.lock().unwrap().push(Rule {
            server,
            name: name.map(str::to_string),
            template,
            id_override,
        });
    }

    /// Authoritative answer for `name` at `server`.
    pub fn answer(&self, server: SocketAddr, name: &str, answers: Vec<Record>) -> &Self {
        let template = Packet {
            header: Header {
                flags: FLAG_AA,
                ..Header::default()
            },
            answers,
            ..Packet::default()
        };
        self.push(server, Some(name), template, None);
        self
    }

    /// Referral to `zone` served by `nameserver`, with optional glue. Applies
    /// to every name asked at `server`.
    pub fn referral(
        &self,
        server: SocketAddr,
        zone: &str,
        nameserver: &str,
        glue: Option<Ipv4Addr>,
    ) -> &Self {
        let template = Packet {
            authorities: vec![Record::ns(zone, 172_800, nameserver)],
            additionals: glue
                .map(|addr| vec![Record::a(nameserver, 172_800, addr)])
                .unwrap_or_default(),
            ..Packet::default()
        };
        self.push(server, None, template, None);
        self
    }

    pub fn nxdomain(&self, server: SocketAddr, name: &str) -> &Self {
        let template = Packet {
            header: Header {
                flags: FLAG_AA | u16::from(RCODE_NXDOMAIN),
                ..Header::default()
            },
            ..Packet::default()
        };
        self.push(server, Some(name), template, None);
        self
    }

    /// Arbitrary reply for every name asked at `server`.
    pub fn reply(&self, server: SocketAddr, template: Packet) -> &Self {
        self.push(server, None, template, None);
        self
    }

    /// Answer carrying a transaction id other than the query's.
    pub fn answer_with_id(&self, server: SocketAddr, name: &str, id: u16, answers: Vec<Record>) -> &Self {
        let template = Packet {
            answers,
            ..Packet::default()
        };
        self.push(server, Some(name), template, Some(id));
        self
    }

    /// `(server, name, type)` for every exchange, in order.
    pub fn queries(&self) -> Vec<(SocketAddr, String, RecordType)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &[u8],
        _timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let query = Packet::decode(query)?;
        let question = query.first_question().cloned().ok_or(DomainError::NoQuestion)?;
        self.queries
            .lock()
            .unwrap()
            .push((server, question.name.clone(), question.qtype));

        let rules = self.rules.lock().unwrap();
        let rule = rules
            .iter()
            .filter(|rule| rule.server == server)
            .find(|rule| {
                rule.name
                    .as_deref()
                    .map_or(true, |name| names_equal(name, &question.name))
            })
            .ok_or_else(|| DomainError::TransportTimeout {
                server: server.to_string(),
            })?;

        let mut reply = rule.template.clone();
        reply.header.id = rule.id_override.unwrap_or(query.header.id);
        reply.header.flags |= FLAG_QR;
        reply.questions = vec![question];
        reply.encode()
    }

    fn protocol_name(&self) -> &'static str {
        "scripted"
    }
}
