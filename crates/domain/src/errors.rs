use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Domain name is not ASCII")]
    NonAsciiName,

    #[error("Label of {0} bytes exceeds the 63 byte limit")]
    LabelTooLong(usize),

    #[error("Encoded name of {0} bytes exceeds the 255 byte limit")]
    NameTooLong(usize),

    #[error("Invalid label type byte 0x{0:02x}")]
    InvalidLabelType(u8),

    #[error("Compression pointer chain too long")]
    PointerChainTooLong,

    #[error("Truncated packet: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Invalid RDATA: {0}")]
    InvalidRdata(String),

    #[error("Query has no question")]
    NoQuestion,

    #[error("Queries of class {0} are not supported")]
    UnsupportedClass(u16),

    #[error("Expected a query but received a response")]
    UnexpectedResponse,

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Response id {received} does not match query id {expected}")]
    ResponseIdMismatch { expected: u16, received: u16 },

    #[error("Delegation chain exceeded {0} hops")]
    DelegationTooDeep(usize),

    #[error("Server {server} returned neither an answer nor a usable referral")]
    NoUsableReferral { server: String },

    #[error("Nameserver {0} could not be resolved to an address")]
    NameserverUnresolvable(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// True for errors raised while decoding untrusted wire data.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidDomainName(_)
                | DomainError::NonAsciiName
                | DomainError::LabelTooLong(_)
                | DomainError::NameTooLong(_)
                | DomainError::InvalidLabelType(_)
                | DomainError::PointerChainTooLong
                | DomainError::Truncated { .. }
                | DomainError::InvalidRdata(_)
                | DomainError::NoQuestion
                | DomainError::UnexpectedResponse
        )
    }
}
