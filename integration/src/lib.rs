#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Integration
//!
//! The venue's wire protocol: JSON frames over a persistent bidirectional
//! text-stream connection (§6). Inbound frames decode into a tagged
//! [`InboundFrame`]; outbound frames are built as [`OutboundFrame`] and
//! serialized to the shape the venue expects. Also home to the HMAC-SHA384
//! request signing the session controller authenticates with.

pub mod auth;
pub mod error;
pub mod frames;

pub use auth::{nonce_now, sign_auth_payload};
pub use error::WireError;
pub use frames::{
    AuthFrame, Capabilities, ErrorFrame, InboundFrame, InfoFrame, MsgType, NewOrderRequest,
    OutboundFrame,
};
