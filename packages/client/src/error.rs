//! Client error definitions.

use thiserror::Error;

/// Errors raised by the terminal client
#[derive(Debug, Error)]
pub enum ClientError {
    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Frame could not be (de)serialized
    #[error("Invalid message: {0}")]
    Json(#[from] serde_json::Error),

    /// Service sent something unexpected
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection is gone
    #[error("Connection closed")]
    Closed,

    /// Terminal input error
    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
