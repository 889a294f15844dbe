//! Store errors.

use arbit_markets::Symbol;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("no book tracked for symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("level update for {symbol} carries a zero amount at price {price}")]
    ZeroAmountLevel {
        symbol: Symbol,
        price: arbit_markets::Price,
    },
}
