//! UDP transport implementation

use async_trait::async_trait;
use lares_core::{codec, Message};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// UDP configuration
#[derive(Debug, Clone)]
pub struct UdpConfig {
    /// Local bind address
    pub bind_addr: SocketAddr,
    /// Port discovery broadcasts are sent to
    pub discovery_port: u16,
    /// Receive buffer size
    pub recv_buffer_size: usize,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            bind_addr: (Ipv4Addr::UNSPECIFIED, lares_core::GATEWAY_PORT).into(),
            discovery_port: lares_core::DISCOVERY_PORT,
            recv_buffer_size: 65536,
        }
    }
}

/// UDP transport (connectionless)
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    config: UdpConfig,
}

impl UdpTransport {
    /// Bind with the default configuration
    pub async fn bind() -> Result<Self> {
        Self::bind_with_config(UdpConfig::default()).await
    }

    /// Bind with config
    pub async fn bind_with_config(config: UdpConfig) -> Result<Self> {
        let socket = UdpSocket::bind(config.bind_addr)
            .await
            .map_err(|e| TransportError::BindFailed(e.to_string()))?;
        socket.set_broadcast(true).map_err(TransportError::Io)?;

        info!("UDP bound to {}", socket.local_addr()?);

        Ok(Self {
            socket: Arc::new(socket),
            config,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(TransportError::Io)
    }

    /// Start receiving datagrams
    ///
    /// Datagrams that fail to decode are logged and skipped; a malformed
    /// packet never stops the loop.
    pub fn start_receiver(&self) -> UdpReceiver {
        let (tx, rx) = mpsc::channel(100);
        let socket = self.socket.clone();
        let max_size = self.config.recv_buffer_size;

        tokio::spawn(async move {
            let mut buf = vec![0u8; max_size];

            loop {
                match socket.recv_from(&mut buf).await {
                    Ok((len, from)) => {
                        debug!("received {} bytes from {}", len, from);
                        match codec::decode(&buf[..len]) {
                            Ok(msg) => {
                                if tx.send((msg, from)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!("dropping undecodable datagram from {}: {}", from, e);
                            }
                        }
                    }
                    Err(e) => {
                        warn!("receive error: {}", e);
                    }
                }
            }
        });

        UdpReceiver { rx }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn broadcast(&self, msg: &Message) -> Result<()> {
        let target = SocketAddr::from((Ipv4Addr::BROADCAST, self.config.discovery_port));
        let bytes = codec::encode(msg)?;

        debug!("broadcasting {} to {}", msg.command(), target);

        self.socket
            .send_to(&bytes, target)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn unicast(&self, to: SocketAddr, msg: &Message) -> Result<()> {
        let bytes = codec::encode(msg)?;

        debug!("sending {} to {}", msg.command(), to);

        self.socket
            .send_to(&bytes, to)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }
}

/// Receiver for decoded inbound messages
pub struct UdpReceiver {
    rx: mpsc::Receiver<(Message, SocketAddr)>,
}

impl UdpReceiver {
    /// Receive the next message with its source address
    pub async fn recv_from(&mut self) -> Option<(Message, SocketAddr)> {
        self.rx.recv().await
    }
}
