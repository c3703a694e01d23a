use super::message_builder::MessageBuilder;
use super::transport::tcp::TcpTransport;
use super::transport::udp::UdpTransport;
use super::transport::DnsTransport;
use super::wire::{ReplyHeader, WireCursor};
use crate::system::ResolvConf;
use async_trait::async_trait;
use cname_resolver_application::ports::CnameQueryPort;
use cname_resolver_domain::config::resolver::DEFAULT_QUERY_TIMEOUT_MS;
use cname_resolver_domain::{DomainError, ResolverConfig};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Used when neither the config file nor resolv.conf names a nameserver.
pub const FALLBACK_NAMESERVER: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 53);

/// The nameserver and timeout a query issuer ends up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamSelection {
    pub server_addr: SocketAddr,
    pub timeout: Duration,
}

impl UpstreamSelection {
    /// The config file wins over resolv.conf, which wins over the built-in
    /// defaults. Only the first nameserver is ever used.
    pub fn choose(config: &ResolverConfig, system: &ResolvConf) -> Result<Self, DomainError> {
        let configured = config
            .nameserver_addrs()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;

        let server_addr = configured
            .first()
            .or_else(|| system.nameservers.first())
            .copied()
            .unwrap_or(FALLBACK_NAMESERVER);

        let timeout = config
            .query_timeout_ms
            .map(Duration::from_millis)
            .or(system.timeout)
            .unwrap_or(Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS));

        Ok(Self {
            server_addr,
            timeout,
        })
    }
}

/// Sends CNAME queries to one nameserver and screens the replies the way a
/// stub resolver does before handing them on: undersized, mismatched,
/// non-NOERROR and answerless replies are all transport failures.
pub struct UpstreamCnameQuery {
    udp: Arc<dyn DnsTransport>,
    tcp: Option<Arc<dyn DnsTransport>>,
    timeout: Duration,
}

impl UpstreamCnameQuery {
    pub fn new(
        server_addr: SocketAddr,
        timeout: Duration,
        reply_buffer_size: usize,
        tcp_fallback: bool,
    ) -> Self {
        let udp: Arc<dyn DnsTransport> =
            Arc::new(UdpTransport::new(server_addr, reply_buffer_size));
        let tcp = tcp_fallback.then(|| {
            Arc::new(TcpTransport::new(server_addr, reply_buffer_size)) as Arc<dyn DnsTransport>
        });
        Self::with_transports(udp, tcp, timeout)
    }

    pub fn with_transports(
        udp: Arc<dyn DnsTransport>,
        tcp: Option<Arc<dyn DnsTransport>>,
        timeout: Duration,
    ) -> Self {
        Self { udp, tcp, timeout }
    }

    /// Builds the issuer from the config file settings, falling back to
    /// `/etc/resolv.conf` for the nameserver and timeout.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, DomainError> {
        Self::from_config_with(config, &ResolvConf::load_system())
    }

    pub fn from_config_with(
        config: &ResolverConfig,
        system: &ResolvConf,
    ) -> Result<Self, DomainError> {
        let upstream = UpstreamSelection::choose(config, system)?;

        debug!(
            server = %upstream.server_addr,
            timeout_ms = upstream.timeout.as_millis() as u64,
            reply_buffer_size = config.reply_buffer_size,
            tcp_fallback = config.tcp_fallback,
            "CNAME query issuer configured"
        );

        Ok(Self::new(
            upstream.server_addr,
            upstream.timeout,
            config.reply_buffer_size,
            config.tcp_fallback,
        ))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CnameQueryPort for UpstreamCnameQuery {
    async fn issue_cname_query(&self, hostname: &str) -> Result<Vec<u8>, DomainError> {
        let (id, query) = MessageBuilder::build_cname_query(hostname)?;

        let response = self.udp.send(&query, self.timeout).await?;
        let header = read_reply_header(&response.bytes)?;

        if !header.is_truncated() {
            check_answer(&header)?;
            debug!(
                hostname = %hostname,
                protocol = response.protocol_used,
                answers = header.ancount,
                "CNAME reply accepted"
            );
            return Ok(response.bytes);
        }

        let Some(tcp) = &self.tcp else {
            return Err(DomainError::InvalidDnsResponse(
                "reply truncated (TC bit set)".to_string(),
            ));
        };

        debug!(hostname = %hostname, id, "Truncated UDP reply, re-sending over TCP");

        let response = tcp.send(&query, self.timeout).await?;
        let header = read_reply_header(&response.bytes)?;
        if header.is_truncated() {
            return Err(DomainError::InvalidDnsResponse(
                "TCP reply has TC bit set".to_string(),
            ));
        }
        check_answer(&header)?;
        debug!(
            hostname = %hostname,
            protocol = response.protocol_used,
            answers = header.ancount,
            "CNAME reply accepted"
        );
        Ok(response.bytes)
    }
}

fn read_reply_header(bytes: &[u8]) -> Result<ReplyHeader, DomainError> {
    let header = ReplyHeader::read(&mut WireCursor::new(bytes))
        .map_err(|e| DomainError::InvalidDnsResponse(format!("undersized reply: {}", e)))?;

    if !header.is_response() {
        return Err(DomainError::InvalidDnsResponse(
            "QR bit clear in reply".to_string(),
        ));
    }
    Ok(header)
}

fn check_answer(header: &ReplyHeader) -> Result<(), DomainError> {
    if header.rcode() != 0 {
        return Err(DomainError::UpstreamRcode(header.rcode_name()));
    }
    if header.ancount == 0 {
        return Err(DomainError::NoAnswer);
    }
    Ok(())
}
