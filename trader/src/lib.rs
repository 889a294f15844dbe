#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Trader
//!
//! The engine facade (§5): wires the session controller, order-chain
//! coordinator, trading-loop guards, and cycle solver into `start()` and
//! `stop()`, the only surface the rest of the world sees (§6 Exit surface).

pub mod config;
pub mod engine;
pub mod error;
pub mod wallet_limiter;

pub use config::SystemConfig;
pub use engine::Engine;
pub use error::EngineError;
