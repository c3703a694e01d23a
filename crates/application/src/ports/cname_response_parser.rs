use cname_resolver_domain::{CnameAnswer, DomainError};

pub trait CnameResponseParser: Send + Sync {
    /// Returns [`DomainError::MalformedResponse`] when the question section
    /// does not match a CNAME query; problems in the answer section yield
    /// [`CnameAnswer::NotFound`].
    fn parse_cname(&self, response: &[u8]) -> Result<CnameAnswer, DomainError>;
}
