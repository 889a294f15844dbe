//! Wallet store: per-(wallet-type, currency) available balance (§3).

use arbit_core::{WalletBalance, WalletKey};
use fnv::FnvHashMap;

#[derive(Debug, Default)]
pub struct WalletStore {
    balances: FnvHashMap<WalletKey, WalletBalance>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, key: WalletKey, balance: WalletBalance) {
        self.balances.insert(key, balance);
    }

    pub fn get(&self, key: &WalletKey) -> Option<&WalletBalance> {
        self.balances.get(key)
    }

    /// The usable amount, or `None` if the wallet is untracked or stale
    /// (§9 open question c: stale until a fresh `calc` response arrives).
    pub fn available(&self, key: &WalletKey) -> Option<arbit_markets::Amount> {
        self.balances.get(key).and_then(|b| b.available)
    }

    /// Marks every tracked wallet stale, pending recomputation. Used after
    /// a reconnect, where prior balances can no longer be trusted.
    pub fn mark_all_stale(&mut self) {
        for balance in self.balances.values_mut() {
            balance.mark_stale();
        }
    }

    /// Keys of every tracked wallet still awaiting a `calc` response.
    pub fn stale_keys(&self) -> Vec<WalletKey> {
        self.balances
            .iter()
            .filter(|(_, balance)| balance.is_stale())
            .map(|(key, _)| key.clone())
            .collect()
    }
}
