#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Execution
//!
//! The two pieces of the engine that actually talk to the venue: the
//! session controller (one websocket connection, auth, reconnect,
//! maintenance handling) and the order-chain coordinator that drives a
//! solved cycle's orders through to fill or compensation.

pub mod chain;
pub mod error;
pub mod session;

pub use chain::{Chain, ChainCoordinator, ChainStatus, Step, CHAIN_HARD_CAP, STEP_TIMEOUT};
pub use error::ExecutionError;
pub use session::{
    ConnectionState, SessionConfig, SessionController, SessionEvent, SessionOutput, SessionStatus,
    API_VERSION,
};
