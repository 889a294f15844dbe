#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Core
//!
//! Domain model shared by every stateful component of the arbit engine:
//! orders, notifications, wallets, the cycle [`Solution`] a strategy hands
//! to the order chain, graceful shutdown signalling, structured logging
//! setup, and the notifier hook the engine calls out on.
//!
//! This crate has no knowledge of the wire protocol (that's
//! `arbit-integration`) or of any particular store's concurrency strategy
//! (that's `arbit-data`); it only defines what the data *is*.

pub mod chain;
pub mod client_id;
pub mod error;
pub mod logging;
pub mod notify;
pub mod order;
pub mod shutdown;
pub mod wallet;

pub use chain::{Instruction, Solution, StepState};
pub use client_id::{ClientId, ClientIdDate};
pub use error::CoreError;
pub use notify::{EngineNotice, Notifier, NullNotifier};
pub use order::{Notification, NotificationStatus, Order, OrderStatus};
pub use shutdown::{AsyncShutdown, Shutdown, SyncShutdown};
pub use wallet::{WalletBalance, WalletKey, WalletType};
