#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Data
//!
//! The stores the session task owns and mutates: order book ladders,
//! wallet balances, orders, trades, and the subscription registry that
//! routes inbound frames to them. Readers (the solver) only ever see
//! cheap, immutable snapshots — mutation stays on the session task.

pub mod books;
pub mod error;
pub mod orders;
pub mod persist;
pub mod shared;
pub mod subscriptions;
pub mod trades;
pub mod wallets;

pub use books::{BookSnapshotSet, BookStore, Level, OrderBook, RawLevel};
pub use error::DataError;
pub use orders::OrderStore;
pub use persist::{NullPersistSink, PersistSink, PERSIST_INTERVAL_SECS};
pub use shared::SharedStores;
pub use subscriptions::{SubscriptionRegistry, SubscriptionRequest};
pub use trades::TradeStore;
pub use wallets::WalletStore;
