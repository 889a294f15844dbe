//! Session-level configuration (§6).

use arbit_markets::Symbol;
use url::Url;

/// The compiled-in protocol version the session expects `info.version` to
/// match. A mismatch is fatal (§4.3).
pub const API_VERSION: u32 = 2;

/// Supervisory reconnect timer period (§4.3).
pub const RECONNECT_INTERVAL_MS: u64 = 2_500;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: Url,
    pub api_key: String,
    pub api_secret: String,
    pub required_symbols: Vec<Symbol>,
}
