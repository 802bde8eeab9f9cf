//! DNS wire format (RFC 1035 §4.1).
//!
//! Pure conversions between datagram bytes and the structured message types.
//! Nothing in here touches a socket or shared state.

mod cursor;
mod header;
mod name;
mod packet;
mod query;
mod question;
mod record;

pub use cursor::WireCursor;
pub use header::{
    rewrite_id, Header, FLAG_AA, FLAG_QR, FLAG_RA, FLAG_RD, FLAG_TC, HEADER_LEN, RCODE_FORMERR,
    RCODE_NOERROR, RCODE_NOTIMP, RCODE_NXDOMAIN, RCODE_SERVFAIL,
};
pub use name::{
    decode_name, encode_name, names_equal, write_name, MAX_LABEL_LEN, MAX_NAME_LEN,
    MAX_POINTER_DEPTH,
};
pub use packet::{min_ttl, Packet};
pub use query::{build_query, build_query_with_id, QueryMode};
pub use question::Question;
pub use record::{Record, RecordData};
