//! Lares Core
//!
//! Wire types and encoding for the Lares LAN gateway protocol. Gateways
//! announce themselves over UDP broadcast, clients unicast follow-up
//! commands, and both sides exchange single-datagram JSON messages.
//!
//! This crate provides:
//! - Protocol message types ([`Message`])
//! - Datagram encoding/decoding ([`codec`])
//! - Helpers for the doubly-encoded `data` payloads

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode, encode};
pub use error::{Error, Result};
pub use message::*;

/// Port gateways listen on for unicast commands
pub const GATEWAY_PORT: u16 = 9898;

/// Port discovery broadcasts are sent to
pub const DISCOVERY_PORT: u16 = 4321;

/// Model tag a gateway reports for itself in heartbeats
pub const GATEWAY_MODEL: &str = "gateway";
