//! Reader for the system stub resolver configuration (`resolv.conf(5)`).
//!
//! Only `nameserver` lines and `options timeout:N` matter here; every other
//! keyword is ignored, as is any line that fails to parse.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const SYSTEM_RESOLV_CONF: &str = "/etc/resolv.conf";

const DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvConf {
    pub nameservers: Vec<SocketAddr>,
    pub timeout: Option<Duration>,
}

impl ResolvConf {
    pub fn parse(contents: &str) -> Self {
        let mut conf = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            let mut words = line.split_whitespace();
            match words.next() {
                Some("nameserver") => {
                    let Some(word) = words.next() else { continue };
                    match word.parse::<IpAddr>() {
                        Ok(ip) => conf.nameservers.push(SocketAddr::new(ip, DNS_PORT)),
                        Err(_) => debug!(entry = %word, "Ignoring unparsable nameserver"),
                    }
                }
                Some("options") => {
                    for option in words {
                        if let Some(secs) = option
                            .strip_prefix("timeout:")
                            .and_then(|n| n.parse::<u64>().ok())
                        {
                            conf.timeout = Some(Duration::from_secs(secs));
                        }
                    }
                }
                _ => {}
            }
        }

        conf
    }

    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// A missing or unreadable file yields an empty configuration.
    pub fn load_system() -> Self {
        match Self::load(SYSTEM_RESOLV_CONF) {
            Ok(conf) => conf,
            Err(e) => {
                debug!(path = SYSTEM_RESOLV_CONF, error = %e, "No system resolver configuration");
                Self::default()
            }
        }
    }
}
