//! Transport error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("bind failed: {0}")]
    BindFailed(String),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("encode error: {0}")]
    Encode(#[from] lares_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
