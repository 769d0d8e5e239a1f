//! Client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] lares_transport::TransportError),

    #[error("subscriber error: {0}")]
    Subscriber(String),
}
