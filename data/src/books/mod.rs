//! Per-symbol order book replica and the store that owns one per subscribed
//! symbol (§4.1).

mod store;

pub use store::{BookSnapshotSet, BookStore};

use std::collections::BTreeMap;
use std::sync::Arc;

use arbit_markets::{Amount, Price};
use tracing::warn;

/// One row of a raw wire level update: `count == 0` removes; the sign of
/// `amount` otherwise disambiguates bid (`>0`) from ask (`<0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawLevel {
    pub price: Price,
    pub count: u32,
    pub amount: Amount,
}

/// A resting level on one side of the ladder: `amount` is always a positive
/// magnitude, the side being implied by which map it lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub price: Price,
    pub count: u32,
    pub amount: Amount,
}

/// Local replica of one symbol's bid/ask ladders.
///
/// Both sides live behind an `Arc` so [`OrderBook::clone`] is O(1): the
/// store hands out clones to the solver as read-only snapshots, and
/// [`Arc::make_mut`] only deep-clones a side on the next mutation if a
/// snapshot is still outstanding (copy-on-write, per §4.1).
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: Arc<BTreeMap<Price, Level>>,
    asks: Arc<BTreeMap<Price, Level>>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both ladders atomically from a full snapshot.
    pub fn apply_snapshot(&mut self, levels: &[RawLevel]) {
        let mut bids = BTreeMap::new();
        let mut asks = BTreeMap::new();
        for raw in levels {
            if raw.count == 0 || raw.amount.is_zero() {
                continue;
            }
            let level = Level {
                price: raw.price,
                count: raw.count,
                amount: raw.amount.abs(),
            };
            if raw.amount.is_negative() {
                asks.insert(raw.price, level);
            } else {
                bids.insert(raw.price, level);
            }
        }
        self.bids = Arc::new(bids);
        self.asks = Arc::new(asks);
    }

    /// Applies a single level update. `count == 0` removes the level from
    /// the side implied by `amount`'s sign (§9 open question b); a
    /// removal of a price absent from that side is a no-op.
    pub fn apply_delta(&mut self, price: Price, count: u32, amount: Amount) {
        if count == 0 {
            let side = if amount.is_negative() {
                Arc::make_mut(&mut self.asks)
            } else {
                Arc::make_mut(&mut self.bids)
            };
            side.remove(&price);
            return;
        }
        if amount.is_zero() {
            warn!(%price, "dropping level update with zero amount and nonzero count");
            return;
        }
        let level = Level {
            price,
            count,
            amount: amount.abs(),
        };
        if amount.is_negative() {
            Arc::make_mut(&mut self.asks).insert(price, level);
        } else {
            Arc::make_mut(&mut self.bids).insert(price, level);
        }
    }

    /// Highest resting bid.
    pub fn best_bid(&self) -> Option<(Price, Amount)> {
        self.bids.iter().next_back().map(|(p, l)| (*p, l.amount))
    }

    /// Lowest resting ask.
    pub fn best_ask(&self) -> Option<(Price, Amount)> {
        self.asks.iter().next().map(|(p, l)| (*p, l.amount))
    }

    /// Bids in the invariant descending order (highest first).
    pub fn bids_descending(&self) -> impl Iterator<Item = (Price, Amount)> + '_ {
        self.bids.iter().rev().map(|(p, l)| (*p, l.amount))
    }

    /// Asks in the invariant ascending order (lowest first).
    pub fn asks_ascending(&self) -> impl Iterator<Item = (Price, Amount)> + '_ {
        self.asks.iter().map(|(p, l)| (*p, l.amount))
    }

    /// True iff both ladders satisfy the strict-ordering, no-zero-row
    /// invariant. Only used defensively in tests; normal operation
    /// maintains this by construction.
    pub fn is_well_formed(&self) -> bool {
        self.bids.values().all(|l| l.count > 0 && !l.amount.is_zero())
            && self.asks.values().all(|l| l.count > 0 && !l.amount.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn raw(price: Decimal, count: u32, amount: Decimal) -> RawLevel {
        RawLevel {
            price: Price::new(price).unwrap(),
            count,
            amount: Amount::new(amount),
        }
    }

    #[test]
    fn snapshot_then_removal_matches_book_maintenance_scenario() {
        let mut book = OrderBook::new();
        book.apply_snapshot(&[
            raw(dec!(100.10), 1, dec!(-5)),
            raw(dec!(100.20), 2, dec!(-10)),
        ]);
        book.apply_delta(Price::new(dec!(100.10)).unwrap(), 0, Amount::new(dec!(-1)));

        let (price, amount) = book.best_ask().unwrap();
        assert_eq!(price.raw(), dec!(100.20));
        assert_eq!(amount.raw(), dec!(10));
    }

    #[test]
    fn removal_on_absent_price_is_a_no_op() {
        let mut book = OrderBook::new();
        book.apply_snapshot(&[raw(dec!(100.20), 2, dec!(-10))]);
        book.apply_delta(Price::new(dec!(50)).unwrap(), 0, Amount::new(dec!(-1)));
        assert_eq!(book.best_ask().unwrap().0.raw(), dec!(100.20));
    }

    #[test]
    fn upsert_keeps_each_side_strictly_ordered() {
        let mut book = OrderBook::new();
        book.apply_delta(Price::new(dec!(10)).unwrap(), 1, Amount::new(dec!(1)));
        book.apply_delta(Price::new(dec!(12)).unwrap(), 1, Amount::new(dec!(1)));
        book.apply_delta(Price::new(dec!(11)).unwrap(), 1, Amount::new(dec!(1)));

        let prices: Vec<Decimal> = book.bids_descending().map(|(p, _)| p.raw()).collect();
        assert_eq!(prices, vec![dec!(12), dec!(11), dec!(10)]);
        assert!(book.is_well_formed());
    }

    #[test]
    fn snapshot_replaces_both_sides_atomically() {
        let mut book = OrderBook::new();
        book.apply_delta(Price::new(dec!(1)).unwrap(), 1, Amount::new(dec!(1)));
        book.apply_snapshot(&[raw(dec!(2), 1, dec!(1))]);
        assert_eq!(book.best_bid().unwrap().0.raw(), dec!(2));
    }

    #[test]
    fn clone_is_copy_on_write() {
        let mut book = OrderBook::new();
        book.apply_delta(Price::new(dec!(1)).unwrap(), 1, Amount::new(dec!(1)));
        let snapshot = book.clone();
        book.apply_delta(Price::new(dec!(2)).unwrap(), 1, Amount::new(dec!(1)));
        assert_eq!(snapshot.best_bid().unwrap().0.raw(), dec!(1));
        assert_eq!(book.best_bid().unwrap().0.raw(), dec!(2));
    }
}
