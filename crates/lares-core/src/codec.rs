//! Datagram encoding and decoding
//!
//! Every message travels as one UTF-8 JSON object per UDP datagram.

use crate::error::{Error, Result};
use crate::message::Message;

/// Encode a message into datagram bytes
pub fn encode(msg: &Message) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| Error::Encode(e.to_string()))
}

/// Decode a datagram into a message
pub fn decode(bytes: &[u8]) -> Result<Message> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}
