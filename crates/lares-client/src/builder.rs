//! Client builder

use lares_transport::Transport;
use std::sync::Arc;

use crate::client::Client;

/// Builder for [`Client`]
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    gateway_port: u16,
}

impl ClientBuilder {
    /// Create a new builder over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            gateway_port: lares_core::GATEWAY_PORT,
        }
    }

    /// Override the port follow-up commands are unicast to
    pub fn gateway_port(mut self, port: u16) -> Self {
        self.gateway_port = port;
        self
    }

    /// Build the client
    pub fn build(self) -> Client {
        Client::from_parts(self.transport, self.gateway_port)
    }
}
