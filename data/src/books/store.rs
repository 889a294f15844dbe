use fnv::FnvHashMap;

use arbit_markets::{Amount, Price, Symbol};

use super::{OrderBook, RawLevel};

/// Owns one [`OrderBook`] per subscribed symbol. Mutated exclusively by the
/// session task; readers take [`BookStore::snapshot_for_solver`].
#[derive(Debug, Default)]
pub struct BookStore {
    books: FnvHashMap<Symbol, OrderBook>,
}

/// An immutable, cheaply-cloned view of every tracked book, handed to the
/// solver so it can walk tops without blocking the session task (§4.1).
pub type BookSnapshotSet = FnvHashMap<Symbol, OrderBook>;

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_snapshot(&mut self, symbol: &Symbol, levels: &[RawLevel]) {
        self.books.entry(symbol.clone()).or_default().apply_snapshot(levels);
    }

    pub fn apply_delta(&mut self, symbol: &Symbol, price: Price, count: u32, amount: Amount) {
        self.books
            .entry(symbol.clone())
            .or_default()
            .apply_delta(price, count, amount);
    }

    pub fn best_bid(&self, symbol: &Symbol) -> Option<(Price, Amount)> {
        self.books.get(symbol).and_then(OrderBook::best_bid)
    }

    pub fn best_ask(&self, symbol: &Symbol) -> Option<(Price, Amount)> {
        self.books.get(symbol).and_then(OrderBook::best_ask)
    }

    pub fn is_tracked(&self, symbol: &Symbol) -> bool {
        self.books.contains_key(symbol)
    }

    /// Drops every tracked book. Used on reconnect once subscriptions have
    /// been cleared and are about to be rebuilt from fresh snapshots.
    pub fn clear(&mut self) {
        self.books.clear();
    }

    /// Cheap clone-on-write snapshot of every book, for the solver.
    pub fn snapshot_for_solver(&self) -> BookSnapshotSet {
        self.books.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tracks_independent_books_per_symbol() {
        let mut store = BookStore::new();
        let btc_usd = Symbol::new("BTC", "USD");
        let eth_usd = Symbol::new("ETH", "USD");

        store.apply_delta(
            &btc_usd,
            Price::new(dec!(100)).unwrap(),
            1,
            Amount::new(dec!(1)),
        );
        store.apply_delta(
            &eth_usd,
            Price::new(dec!(10)).unwrap(),
            1,
            Amount::new(dec!(1)),
        );

        assert_eq!(store.best_bid(&btc_usd).unwrap().0.raw(), dec!(100));
        assert_eq!(store.best_bid(&eth_usd).unwrap().0.raw(), dec!(10));
    }

    #[test]
    fn unknown_symbol_has_no_book() {
        let store = BookStore::new();
        assert!(store.best_bid(&Symbol::new("BTC", "USD")).is_none());
    }

    #[test]
    fn snapshot_for_solver_is_unaffected_by_later_writes() {
        let mut store = BookStore::new();
        let symbol = Symbol::new("BTC", "USD");
        store.apply_delta(&symbol, Price::new(dec!(100)).unwrap(), 1, Amount::new(dec!(1)));

        let snapshot = store.snapshot_for_solver();
        store.apply_delta(&symbol, Price::new(dec!(200)).unwrap(), 1, Amount::new(dec!(1)));

        assert_eq!(
            snapshot.get(&symbol).unwrap().best_bid().unwrap().0.raw(),
            dec!(100)
        );
        assert_eq!(store.best_bid(&symbol).unwrap().0.raw(), dec!(200));
    }
}
