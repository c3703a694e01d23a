use async_trait::async_trait;
use cname_resolver_domain::DomainError;

/// Sends a CNAME/IN query and hands back the raw reply.
///
/// Implementations are not required to be reentrant; callers serialize
/// access through [`crate::use_cases::ResolveCnameUseCase`].
#[async_trait]
pub trait CnameQueryPort: Send + Sync {
    async fn issue_cname_query(&self, hostname: &str) -> Result<Vec<u8>, DomainError>;
}
