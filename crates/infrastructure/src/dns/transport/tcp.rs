//! TCP Transport for DNS queries (RFC 1035 §4.2.2)
//!
//! Each message is prefixed with its length as a big-endian u16. Used when a
//! UDP reply comes back with the TC bit set.

use super::udp::validate_response_id;
use super::{io_error, timeout_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use cname_resolver_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct TcpTransport {
    server_addr: SocketAddr,
    max_response_size: usize,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr, max_response_size: usize) -> Self {
        Self {
            server_addr,
            max_response_size,
        }
    }

    async fn exchange(
        &self,
        stream: &mut TcpStream,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        send_with_length_prefix(stream, message_bytes)
            .await
            .map_err(|e| io_error(self.server_addr, "Failed to send TCP query to", e))?;

        debug!(
            server = %self.server_addr,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        read_with_length_prefix(stream, self.max_response_size)
            .await
            .map_err(|e| match e {
                ReadError::Io(e) => {
                    io_error(self.server_addr, "Failed to read TCP response from", e)
                }
                ReadError::TooLarge(size) => DomainError::ResponseTooLarge {
                    size,
                    max: self.max_response_size,
                },
            })
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let mut stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| timeout_error(self.server_addr))?
            .map_err(|e| io_error(self.server_addr, "Failed to connect to TCP server", e))?;

        stream
            .set_nodelay(true)
            .map_err(|e| io_error(self.server_addr, "Failed to set TCP_NODELAY for", e))?;

        let response_bytes =
            tokio::time::timeout(timeout, self.exchange(&mut stream, message_bytes))
                .await
                .map_err(|_| timeout_error(self.server_addr))??;

        validate_response_id(message_bytes, &response_bytes)?;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

#[derive(Debug)]
pub(crate) enum ReadError {
    Io(std::io::Error),
    TooLarge(usize),
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> std::io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "DNS message longer than 65535 bytes",
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(
    stream: &mut S,
    max_response_size: usize,
) -> Result<Vec<u8>, ReadError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(ReadError::Io)?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len > max_response_size {
        return Err(ReadError::TooLarge(response_len));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(ReadError::Io)?;

    Ok(response)
}
