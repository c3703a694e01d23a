use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Malformed DNS response: {0}")]
    MalformedResponse(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("DNS response too large: {size} bytes (max {max})")]
    ResponseTooLarge { size: usize, max: usize },

    #[error("DNS response ID mismatch: expected {expected}, got {received}")]
    ResponseIdMismatch { expected: u16, received: u16 },

    #[error("Upstream answered {0}")]
    UpstreamRcode(&'static str),

    #[error("No answer records in DNS response")]
    NoAnswer,

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CNAME resolver is not initialized")]
    ResolverNotInitialized,
}

impl DomainError {
    /// Failures that mean "the query could not produce a usable reply".
    ///
    /// The resolver reports these to callers as "no CNAME" instead of an
    /// error; only a reply that contradicts the question sent is surfaced.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidDomainName(_)
                | DomainError::InvalidDnsResponse(_)
                | DomainError::ResponseTooLarge { .. }
                | DomainError::ResponseIdMismatch { .. }
                | DomainError::UpstreamRcode(_)
                | DomainError::NoAnswer
                | DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::IoError(_)
        )
    }
}
