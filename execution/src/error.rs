//! Session and chain errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("wire decode error: {0}")]
    Wire(#[from] arbit_integration::WireError),

    #[error("protocol version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u32, got: u32 },

    #[error("outbound frame channel closed")]
    OutboundChannelClosed,
}
