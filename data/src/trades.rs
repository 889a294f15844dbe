//! Trade store: cumulative filled amount per order, used by the chain
//! coordinator to detect `ACK_ORDER → FILLED` via `tu` trade events (§4.5).

use arbit_core::ClientId;
use arbit_markets::Amount;
use fnv::FnvHashMap;
use rust_decimal::Decimal;

#[derive(Debug, Default)]
pub struct TradeStore {
    filled: FnvHashMap<ClientId, Amount>,
}

impl TradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a trade execution against `client_id`, accumulating onto
    /// whatever has already filled for that order.
    pub fn record_fill(&mut self, client_id: ClientId, amount: Amount) {
        let entry = self.filled.entry(client_id).or_insert(Amount::new(Decimal::ZERO));
        *entry = *entry + amount;
    }

    pub fn cumulative_filled(&self, client_id: ClientId) -> Amount {
        self.filled
            .get(&client_id)
            .copied()
            .unwrap_or(Amount::new(Decimal::ZERO))
    }

    /// True once the cumulative filled magnitude reaches `target`'s.
    pub fn is_fully_filled(&self, client_id: ClientId, target: Amount) -> bool {
        self.cumulative_filled(client_id).abs().raw() >= target.abs().raw()
    }
}
