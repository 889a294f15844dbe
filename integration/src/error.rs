//! Wire decoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame has unrecognized shape: {0}")]
    UnrecognizedShape(String),

    #[error("control frame has unknown event {0:?}")]
    UnknownEvent(String),

    #[error("data frame array is too short: {0}")]
    ArrayTooShort(String),
}
