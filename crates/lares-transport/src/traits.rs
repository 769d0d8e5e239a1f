//! Transport trait definitions

use async_trait::async_trait;
use lares_core::Message;
use std::net::SocketAddr;

use crate::error::Result;

/// Outbound half of the wire: how the client hands messages to the network
///
/// The client core depends only on this trait; tests substitute a
/// recording implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Broadcast a message to every gateway on the local network
    async fn broadcast(&self, msg: &Message) -> Result<()>;

    /// Send a message to one gateway
    async fn unicast(&self, to: SocketAddr, msg: &Message) -> Result<()>;
}
