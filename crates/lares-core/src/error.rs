//! Error types for the Lares protocol

use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Protocol error types
#[derive(Error, Debug)]
pub enum Error {
    /// Message could not be serialized
    #[error("encode error: {0}")]
    Encode(String),

    /// Top-level JSON could not be parsed into a message
    #[error("decode error: {0}")]
    Decode(String),

    /// The doubly-encoded `data` field failed its second parse
    #[error("nested payload error: {0}")]
    NestedPayload(String),
}
