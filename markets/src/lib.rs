#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Markets
//!
//! Venue-agnostic primitives shared by every other `arbit` crate: trading
//! [`Symbol`]s, order [`Side`], and fixed-point [`Price`]/[`Amount`] types.
//!
//! Kept deliberately small — this crate has no async runtime, no I/O, and
//! no knowledge of any particular venue's wire format. Everything in here
//! is pure, total, and cheap to clone.

pub mod price;
pub mod side;
pub mod symbol;

pub use price::{Amount, Price, PriceError};
pub use side::Side;
pub use symbol::{Symbol, SymbolError};
