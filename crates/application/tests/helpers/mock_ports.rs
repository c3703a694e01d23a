#![allow(dead_code)]

use async_trait::async_trait;
use cname_resolver_application::ports::{CnameQueryPort, CnameResponseParser};
use cname_resolver_domain::{CnameAnswer, DomainError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Query port answering from a per-hostname table.
///
/// Tracks how many queries are running at once so tests can assert the
/// use case never overlaps them.
#[derive(Clone, Default)]
pub struct MockCnameQuery {
    responses: Arc<RwLock<HashMap<String, Result<Vec<u8>, DomainError>>>>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockCnameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_response(&self, hostname: &str, bytes: &[u8]) {
        self.responses
            .write()
            .unwrap()
            .insert(hostname.to_string(), Ok(bytes.to_vec()));
    }

    pub fn set_error(&self, hostname: &str, error: DomainError) {
        self.responses
            .write()
            .unwrap()
            .insert(hostname.to_string(), Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CnameQueryPort for MockCnameQuery {
    async fn issue_cname_query(&self, hostname: &str) -> Result<Vec<u8>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = self
            .responses
            .read()
            .unwrap()
            .get(hostname)
            .cloned()
            .unwrap_or_else(|| {
                Err(DomainError::TransportTimeout {
                    server: "mock".to_string(),
                })
            });

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Parser reading a tiny text protocol instead of DNS wire format:
/// `cname:<target>` is found, `none` is not found, anything else is malformed.
#[derive(Default)]
pub struct TextCnameParser;

impl CnameResponseParser for TextCnameParser {
    fn parse_cname(&self, response: &[u8]) -> Result<CnameAnswer, DomainError> {
        let text = std::str::from_utf8(response)
            .map_err(|e| DomainError::MalformedResponse(e.to_string()))?;

        if let Some(target) = text.strip_prefix("cname:") {
            Ok(CnameAnswer::Found(target.to_string()))
        } else if text == "none" {
            Ok(CnameAnswer::NotFound)
        } else {
            Err(DomainError::MalformedResponse(format!(
                "unexpected reply '{}'",
                text
            )))
        }
    }
}
