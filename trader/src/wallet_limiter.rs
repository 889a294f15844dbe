//! Wallet recompute rate limiting (§5): at most 30 keys per `calc` batch,
//! at most 8 batches per second per client.

use std::time::{Duration, Instant};

use arbit_core::WalletKey;

pub const MAX_KEYS_PER_BATCH: usize = 30;
pub const MAX_BATCHES_PER_SECOND: u32 = 8;

/// The `calc` key format the venue expects (§6): `wallet_<type>_<currency>`.
pub fn calc_key(key: &WalletKey) -> String {
    format!("wallet_{}_{}", key.wallet_type.as_str(), key.currency)
}

#[derive(Debug)]
pub struct WalletRecomputeLimiter {
    window_start: Instant,
    batches_in_window: u32,
}

impl WalletRecomputeLimiter {
    pub fn new() -> Self {
        WalletRecomputeLimiter {
            window_start: Instant::now(),
            batches_in_window: 0,
        }
    }

    /// Chunks `keys` into batches of at most [`MAX_KEYS_PER_BATCH`],
    /// admitting only as many as the current one-second window still has
    /// budget for. Callers retry whatever didn't get admitted on the next
    /// tick, so starvation only ever delays a stale wallet, never drops it.
    pub fn admit_batches(&mut self, keys: &[String]) -> Vec<Vec<String>> {
        self.roll_window();
        let mut admitted = Vec::new();
        for chunk in keys.chunks(MAX_KEYS_PER_BATCH) {
            if self.batches_in_window >= MAX_BATCHES_PER_SECOND {
                break;
            }
            admitted.push(chunk.to_vec());
            self.batches_in_window += 1;
        }
        admitted
    }

    fn roll_window(&mut self) {
        if self.window_start.elapsed() >= Duration::from_secs(1) {
            self.window_start = Instant::now();
            self.batches_in_window = 0;
        }
    }
}

impl Default for WalletRecomputeLimiter {
    fn default() -> Self {
        Self::new()
    }
}
