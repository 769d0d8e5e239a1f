//! Lares Client
//!
//! High-level client for Lares home-automation gateways. Gateways
//! announce themselves over UDP broadcast; the client keeps a registry
//! mapping every gateway and device identifier to live gateway state and
//! routes each inbound message to the gateway that owns it.
//!
//! ```no_run
//! use lares_client::{Client, ClientEvent};
//! use lares_transport::UdpTransport;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(UdpTransport::bind().await?);
//!     let receiver = transport.start_receiver();
//!
//!     let client = Client::new(transport);
//!     client.subscribe(|event: &ClientEvent| -> lares_client::Result<()> {
//!         match event {
//!             ClientEvent::NewGateway(gateway) => {
//!                 println!("found gateway {} at {}", gateway.sid, gateway.addr);
//!             }
//!             _ => {}
//!         }
//!         Ok(())
//!     });
//!
//!     client.discover_gateways().await?;
//!     client.run(receiver).await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod error;
pub mod event;
pub mod gateway;

mod registry;

pub use builder::ClientBuilder;
pub use client::Client;
pub use error::{ClientError, Result};
pub use event::{ClientEvent, EventHandler, SubscriptionId};
pub use gateway::{Device, Gateway};
