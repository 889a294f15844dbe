//! Wallet balances.

use arbit_markets::Amount;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The venue wallet a balance lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletType {
    Exchange,
    Margin,
    Funding,
    /// Any wallet type the venue reports that isn't one of the above.
    Other(SmolStr),
}

impl WalletType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "exchange" => WalletType::Exchange,
            "margin" => WalletType::Margin,
            "funding" => WalletType::Funding,
            other => WalletType::Other(SmolStr::new(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WalletType::Exchange => "exchange",
            WalletType::Margin => "margin",
            WalletType::Funding => "funding",
            WalletType::Other(s) => s.as_str(),
        }
    }
}

/// Key identifying a wallet: its type plus the currency held in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletKey {
    pub wallet_type: WalletType,
    pub currency: SmolStr,
}

impl WalletKey {
    pub fn new(wallet_type: WalletType, currency: &str) -> Self {
        WalletKey {
            wallet_type,
            currency: SmolStr::new(currency),
        }
    }
}

/// A wallet's balance. `available` is `None` while the venue is
/// recomputing it (§9 open question c): the wallet is treated as unusable
/// until a fresh value arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub balance: Amount,
    pub available: Option<Amount>,
}

impl WalletBalance {
    /// Mark the balance stale, pending a `calc` recomputation response.
    pub fn mark_stale(&mut self) {
        self.available = None;
    }

    pub fn is_stale(&self) -> bool {
        self.available.is_none()
    }
}
