//! A single handle bundling every store, cheaply cloned and shared between
//! the session task, the trading loop, and the chain coordinator.
//!
//! The engine is logically single-threaded (one task drives all mutation,
//! per the concurrency model), but that task is composed from several
//! crates; `Arc<RwLock<_>>` is the seam that lets each crate hold its own
//! handle without a god-struct owning every concern. Readers (the solver)
//! take a lock just long enough to clone a cheap [`OrderBook`]-style
//! snapshot, never holding it across an `.await`.

use std::sync::Arc;

use arbit_markets::Symbol;
use parking_lot::RwLock;

use crate::books::BookStore;
use crate::orders::OrderStore;
use crate::subscriptions::SubscriptionRegistry;
use crate::trades::TradeStore;
use crate::wallets::WalletStore;

#[derive(Debug, Clone)]
pub struct SharedStores {
    pub books: Arc<RwLock<BookStore>>,
    pub wallets: Arc<RwLock<WalletStore>>,
    pub orders: Arc<RwLock<OrderStore>>,
    pub trades: Arc<RwLock<TradeStore>>,
    pub subscriptions: Arc<RwLock<SubscriptionRegistry<Symbol>>>,
}

impl SharedStores {
    pub fn new() -> Self {
        SharedStores {
            books: Arc::new(RwLock::new(BookStore::new())),
            wallets: Arc::new(RwLock::new(WalletStore::new())),
            orders: Arc::new(RwLock::new(OrderStore::new())),
            trades: Arc::new(RwLock::new(TradeStore::new())),
            subscriptions: Arc::new(RwLock::new(SubscriptionRegistry::new())),
        }
    }
}

impl Default for SharedStores {
    fn default() -> Self {
        Self::new()
    }
}
