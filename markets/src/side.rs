//! Order/trade side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trade or order relative to the base currency of a [`Symbol`](crate::Symbol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Acquiring the base currency (spending the quote currency).
    Buy,
    /// Disposing of the base currency (receiving the quote currency).
    Sell,
}

impl Side {
    /// The side implied by a signed amount: positive is `Buy`, negative is `Sell`.
    ///
    /// A zero amount has no side; callers must reject it before calling this.
    pub fn of_signed_amount(amount: rust_decimal::Decimal) -> Option<Self> {
        use std::cmp::Ordering;
        match amount.cmp(&rust_decimal::Decimal::ZERO) {
            Ordering::Greater => Some(Side::Buy),
            Ordering::Less => Some(Side::Sell),
            Ordering::Equal => None,
        }
    }

    /// Returns the opposite side.
    pub fn flip(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}
