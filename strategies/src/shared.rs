//! Small utilities shared by strategies in this crate.

use arbit_data::BookSnapshotSet;
use arbit_markets::Symbol;
use rust_decimal::Decimal;
use smol_str::SmolStr;

/// Prices `amount` of `currency` in USD using a direct pair if one is
/// tracked, falling back to its inverse (§4.4: "a reference price ... or
/// chained if no direct pair"). Returns `None` if neither leg is known,
/// meaning the cycle's profit cannot be priced and must be rejected.
pub fn usd_value(currency: &str, amount: Decimal, books: &BookSnapshotSet) -> Option<Decimal> {
    if currency.eq_ignore_ascii_case("USD") {
        return Some(amount);
    }
    let direct = Symbol::new(currency, "USD");
    if let Some(book) = books.get(&direct) {
        if let Some((price, _)) = book.best_bid() {
            return Some(amount * price.raw());
        }
    }
    let inverse = Symbol::new("USD", currency);
    if let Some(book) = books.get(&inverse) {
        if let Some((price, _)) = book.best_ask() {
            if !price.raw().is_zero() {
                return Some(amount / price.raw());
            }
        }
    }
    None
}

/// True when both legs of `symbol` are in the max-volume universe.
pub fn pair_in_universe(symbol: &Symbol, universe: &[SmolStr]) -> bool {
    universe.iter().any(|c| c.as_str() == symbol.base())
        && universe.iter().any(|c| c.as_str() == symbol.quote())
}
