#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Risk
//!
//! The trading loop's admission gates: the five connection/interval/
//! subscription/chain preconditions (§4.6) and the per-currency minimum
//! order size table (§4.4) a solved cycle's hops must clear before any
//! order goes out.

pub mod check;
pub mod error;
pub mod guards;

pub use check::{CheckAtLeast, CheckAtLeastError, RiskCheck};
pub use error::RiskError;
pub use guards::{GuardContext, MinOrderSizeTable, TradingGuards};
