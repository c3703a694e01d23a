use crate::ports::{CnameQueryPort, CnameResponseParser};
use cname_resolver_domain::{CnameLookup, DomainError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Looks up the CNAME target of a hostname, one lookup at a time.
pub struct ResolveCnameUseCase {
    query: Arc<dyn CnameQueryPort>,
    parser: Arc<dyn CnameResponseParser>,
    lock: Mutex<()>,
}

impl ResolveCnameUseCase {
    pub fn new(query: Arc<dyn CnameQueryPort>, parser: Arc<dyn CnameResponseParser>) -> Self {
        Self {
            query,
            parser,
            lock: Mutex::new(()),
        }
    }

    /// Transport failures and missing answers come back as
    /// `found == false`; only a malformed question section is an error.
    pub async fn execute(&self, hostname: &str) -> Result<CnameLookup, DomainError> {
        let _guard = self.lock.lock().await;

        let response = match self.query.issue_cname_query(hostname).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_transport_failure() => {
                debug!(hostname = %hostname, error = %e, "CNAME query failed");
                return Ok(CnameLookup::not_found());
            }
            Err(e) => return Err(e),
        };

        match self.parser.parse_cname(&response) {
            Ok(answer) => {
                let lookup = CnameLookup::from(answer);
                debug!(
                    hostname = %hostname,
                    found = lookup.found,
                    cname = %lookup.cname,
                    "CNAME lookup finished"
                );
                Ok(lookup)
            }
            Err(e) => {
                warn!(
                    hostname = %hostname,
                    error = %e,
                    response_len = response.len(),
                    "Rejected CNAME reply"
                );
                Err(e)
            }
        }
    }
}
