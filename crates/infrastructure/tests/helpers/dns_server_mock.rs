#![allow(dead_code)]
use super::builders::ReplyBuilder;
use cname_resolver_infrastructure::dns::wire::{expand_name, HEADER_LEN};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::oneshot;

/// How the mock server answers a query.
#[derive(Debug, Clone)]
pub enum MockReply {
    Cname(String),
    NxDomain,
    NoAnswer,
    WrongId,
    NotResponse,
    /// Empty TC reply over UDP, full CNAME reply over TCP.
    Truncated(String),
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// Listens for UDP and TCP on the same loopback port.
    pub async fn start(reply: MockReply) -> Result<Self, std::io::Error> {
        let (socket, listener) = Self::bind_pair().await?;
        let addr = socket.local_addr()?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = udp_queries.clone();
        let tcp_count = tcp_queries.clone();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_udp_reply(&reply, &buf[..len]) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    result = listener.accept() => {
                        if let Ok((stream, _)) = result {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(Self::serve_tcp(stream, reply.clone()));
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    async fn bind_pair() -> Result<(UdpSocket, TcpListener), std::io::Error> {
        let mut last_err = None;
        for _ in 0..16 {
            let socket = UdpSocket::bind("127.0.0.1:0").await?;
            match TcpListener::bind(socket.local_addr()?).await {
                Ok(listener) => return Ok((socket, listener)),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| std::io::Error::other("no free port")))
    }

    async fn serve_tcp(mut stream: TcpStream, reply: MockReply) {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut query).await.is_err() {
            return;
        }

        if let Some(response) = Self::build_tcp_reply(&reply, &query) {
            let _ = stream
                .write_all(&(response.len() as u16).to_be_bytes())
                .await;
            let _ = stream.write_all(&response).await;
            let _ = stream.flush().await;
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    fn build_udp_reply(reply: &MockReply, query: &[u8]) -> Option<Vec<u8>> {
        let (id, qname) = Self::read_query(query)?;
        let builder = ReplyBuilder::new(&qname).id(id).compressed();

        let response = match reply {
            MockReply::Cname(target) => builder.cname(target).build(),
            MockReply::NxDomain => builder.rcode(3).build(),
            MockReply::NoAnswer => builder.build(),
            MockReply::WrongId => builder.id(id.wrapping_add(1)).cname("x.example.com").build(),
            MockReply::NotResponse => {
                let mut bytes = builder.cname("x.example.com").build();
                bytes[2] &= 0x7F;
                bytes
            }
            MockReply::Truncated(_) => builder.truncated().build(),
            MockReply::Silent => return None,
        };
        Some(response)
    }

    fn build_tcp_reply(reply: &MockReply, query: &[u8]) -> Option<Vec<u8>> {
        match reply {
            MockReply::Truncated(target) => {
                let (id, qname) = Self::read_query(query)?;
                Some(
                    ReplyBuilder::new(&qname)
                        .id(id)
                        .compressed()
                        .cname(target)
                        .build(),
                )
            }
            other => Self::build_udp_reply(other, query),
        }
    }

    fn read_query(query: &[u8]) -> Option<(u16, String)> {
        if query.len() < HEADER_LEN {
            return None;
        }
        let id = u16::from_be_bytes([query[0], query[1]]);
        let qname = expand_name(query, HEADER_LEN).ok()?.name;
        Some((id, qname))
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
