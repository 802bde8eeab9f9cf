use super::{RecordClass, RecordType};
use std::fmt;
use std::sync::Arc;

/// A question the resolver is asked to answer.
///
/// `id` carries the client's transaction id through resolution so the final
/// response can be returned without rewriting it.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub record_class: RecordClass,
    pub id: Option<u16>,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            record_class: RecordClass::IN,
            id: None,
        }
    }

    pub fn with_id(mut self, id: u16) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.domain, self.record_class, self.record_type)
    }
}
