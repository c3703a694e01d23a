//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). The reply is read into a buffer of
//! `max_response_size` octets; anything larger is rejected rather than
//! silently cut.

use super::{io_error, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use cname_resolver_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
    max_response_size: usize,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr, max_response_size: usize) -> Self {
        Self {
            server_addr,
            max_response_size,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| io_error(self.server_addr, "Failed to bind UDP socket for", e))?;

        let bytes_sent =
            tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
                .await
                .map_err(|_| timeout_error(self.server_addr))?
                .map_err(|e| io_error(self.server_addr, "Failed to send UDP query to", e))?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        // One spare octet tells an oversized datagram apart from one that fits exactly
        let mut recv_buf = vec![0u8; self.max_response_size + 1];

        let (bytes_received, from_addr) =
            tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| timeout_error(self.server_addr))?
                .map_err(|e| {
                    io_error(self.server_addr, "Failed to receive UDP response from", e)
                })?;

        if from_addr.ip() != self.server_addr.ip() {
            warn!(
                expected = %self.server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
            return Err(DomainError::InvalidDnsResponse(format!(
                "reply from {} instead of {}",
                from_addr, self.server_addr
            )));
        }

        if bytes_received > self.max_response_size {
            return Err(DomainError::ResponseTooLarge {
                size: bytes_received,
                max: self.max_response_size,
            });
        }

        recv_buf.truncate(bytes_received);
        validate_response_id(message_bytes, &recv_buf)?;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

/// Checks that the reply carries the ID of the query it answers.
pub fn validate_response_id(query: &[u8], response: &[u8]) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "message too short to carry an ID (query {} bytes, response {} bytes)",
            query.len(),
            response.len()
        )));
    }

    let expected = u16::from_be_bytes([query[0], query[1]]);
    let received = u16::from_be_bytes([response[0], response[1]]);
    if expected != received {
        return Err(DomainError::ResponseIdMismatch { expected, received });
    }
    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod udp_test;
