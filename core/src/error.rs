//! Central error type for the `arbit` core domain model.

use thiserror::Error;

/// Errors raised while constructing or validating core domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("symbol error: {0}")]
    Symbol(#[from] arbit_markets::SymbolError),

    #[error("price error: {0}")]
    Price(#[from] arbit_markets::PriceError),

    #[error("client id {0} exceeds the 45-bit range")]
    ClientIdOutOfRange(u64),
}
