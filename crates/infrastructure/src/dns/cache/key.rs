use compact_str::CompactString;
use ferrous_resolver_domain::{Question, RecordClass, RecordType};
use std::fmt;

/// Cache key: `(name, type, class)`.
///
/// The name is stored lowercased without a trailing dot, so keys built from
/// `Example.COM.` and `example.com` are equal. Names up to 24 bytes stay
/// inline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: CompactString,
    pub record_type: RecordType,
    pub record_class: RecordClass,
}

impl CacheKey {
    #[inline]
    pub fn new(domain: &str, record_type: RecordType, record_class: RecordClass) -> Self {
        let trimmed = domain.strip_suffix('.').unwrap_or(domain);
        let mut normalized = CompactString::with_capacity(trimmed.len());
        normalized.extend(trimmed.chars().map(|c| c.to_ascii_lowercase()));
        Self {
            domain: normalized,
            record_type,
            record_class,
        }
    }

    #[inline]
    pub fn from_question(question: &Question) -> Self {
        Self::new(&question.name, question.qtype, question.qclass)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.domain, self.record_class, self.record_type)
    }
}
