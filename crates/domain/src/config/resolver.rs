use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use super::errors::ConfigError;

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_REPLY_BUFFER_SIZE: usize = 1024;

const MIN_REPLY_BUFFER_SIZE: usize = 12;
const MAX_REPLY_BUFFER_SIZE: usize = 65535;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Nameservers as `ip` or `ip:port`. Only the first one is queried;
    /// when empty the system resolver configuration is used.
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// Per-query timeout. When unset, `options timeout:N` from the system
    /// resolver configuration applies, then [`DEFAULT_QUERY_TIMEOUT_MS`].
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,

    #[serde(default = "default_reply_buffer_size")]
    pub reply_buffer_size: usize,

    /// Re-send the query over TCP when the UDP reply has the TC bit set.
    #[serde(default = "default_true")]
    pub tcp_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            nameservers: Vec::new(),
            query_timeout_ms: None,
            reply_buffer_size: default_reply_buffer_size(),
            tcp_fallback: true,
        }
    }
}

impl ResolverConfig {
    pub fn nameserver_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.nameservers
            .iter()
            .map(|entry| parse_nameserver(entry))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reply_buffer_size < MIN_REPLY_BUFFER_SIZE
            || self.reply_buffer_size > MAX_REPLY_BUFFER_SIZE
        {
            return Err(ConfigError::Validation(format!(
                "reply_buffer_size must be between {} and {}, got {}",
                MIN_REPLY_BUFFER_SIZE, MAX_REPLY_BUFFER_SIZE, self.reply_buffer_size
            )));
        }

        if self.query_timeout_ms == Some(0) {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }

        self.nameserver_addrs()?;
        Ok(())
    }
}

/// Parses `1.1.1.1`, `1.1.1.1:5353`, `::1` or `[::1]:5353`.
pub fn parse_nameserver(entry: &str) -> Result<SocketAddr, ConfigError> {
    let entry = entry.trim();

    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let bare = entry
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(entry);

    bare.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| ConfigError::Validation(format!("Invalid nameserver '{}'", entry)))
}

fn default_reply_buffer_size() -> usize {
    DEFAULT_REPLY_BUFFER_SIZE
}

fn default_true() -> bool {
    true
}
