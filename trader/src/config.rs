//! Engine configuration (§6): the external, typed configuration surface.
//! An operator-facing loader populating this from JSON/TOML/env is out of
//! scope (§1) — only the typed struct it populates is in scope.

use std::time::Duration;

use arbit_markets::Symbol;
use rust_decimal::Decimal;
use serde::Deserialize;
use smol_str::SmolStr;
use url::Url;

/// The compiled-in protocol version; kept alongside the session's own
/// constant so configuration documentation has a single source to cite.
pub use arbit_execution::API_VERSION;

/// Client-id date format used in cancel-by-client-id frames (§6).
pub const CLIENT_ID_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default trading loop interval (§4.6).
pub const DEFAULT_MIN_TRADING_INTERVAL_MS: u64 = 500;

/// Delay between `start()` opening the connection and arming the trading
/// timer (§5 Lifecycle).
pub const STARTUP_TRADING_DELAY: Duration = Duration::from_secs(5);

/// Poll period `stop()` uses while waiting for the trading flag to clear
/// (§5 Lifecycle).
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Coarse safety timeout releasing the trading flag if a chain never
/// reaches a terminal state (§4.6).
pub const TRADING_FLAG_SAFETY_TIMEOUT: Duration = Duration::from_secs(60);

/// §6 enumerated configuration plus the secondary constants a deployment
/// must supply: symbol universe, min-order-size table, max-volume
/// currency/pair filters, and the taker fee.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    pub venue_url: Url,
    pub api_key: String,
    pub api_secret: String,
    /// The base currency the solver cycles back to (`c₀`).
    pub currency: String,
    /// `A₀`: the nominal starting amount per solve attempt, in `currency`.
    pub max_amount: Decimal,
    pub min_path_length: usize,
    pub max_path_length: usize,
    pub min_path_profit_usd: Decimal,
    /// The max-volume currencies `C` the cycle search is restricted to.
    pub symbol_universe: Vec<String>,
    /// Every tradeable pair the session subscribes book updates for.
    pub required_symbols: Vec<Symbol>,
    /// Per-currency minimum order size; entries not listed fall back to
    /// `"OTHER"`'s value.
    pub min_order_size: Vec<(String, Decimal)>,
    pub min_order_size_default: Decimal,
    pub taker_fee: Decimal,
    pub amount_precision: u32,
    #[serde(default = "default_min_trading_interval_ms")]
    pub min_trading_interval_ms: u64,
}

fn default_min_trading_interval_ms() -> u64 {
    DEFAULT_MIN_TRADING_INTERVAL_MS
}

impl SystemConfig {
    pub fn base_currency(&self) -> SmolStr {
        SmolStr::new(&self.currency)
    }

    pub fn min_trading_interval(&self) -> Duration {
        Duration::from_millis(self.min_trading_interval_ms)
    }
}
