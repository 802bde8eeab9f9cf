use super::header::FLAG_RD;
use super::{Header, Question};
use crate::{DomainError, RecordType};

/// How an outbound query will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Sent to a recursive server: recursion desired.
    Stub,
    /// Sent to root or authoritative servers, which do not recurse.
    Iterative,
}

/// Builds a single-question IN query with a fresh random transaction id.
pub fn build_query(
    name: &str,
    record_type: RecordType,
    mode: QueryMode,
) -> Result<(u16, Vec<u8>), DomainError> {
    let id = fastrand::u16(..);
    let bytes = build_query_with_id(id, name, record_type, mode)?;
    Ok((id, bytes))
}

pub fn build_query_with_id(
    id: u16,
    name: &str,
    record_type: RecordType,
    mode: QueryMode,
) -> Result<Vec<u8>, DomainError> {
    let flags = match mode {
        QueryMode::Stub => FLAG_RD,
        QueryMode::Iterative => 0,
    };
    let header = Header {
        id,
        flags,
        qdcount: 1,
        ..Header::default()
    };

    let mut out = Vec::with_capacity(name.len() + 18);
    header.encode(&mut out);
    Question::new(name, record_type).encode(&mut out)?;
    Ok(out)
}
