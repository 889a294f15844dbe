//! Fixed-point price and amount types.
//!
//! The venue truncates prices to five significant digits and transmits both
//! prices and amounts as decimal strings, never floats. Everything here is
//! built on [`rust_decimal::Decimal`] so that equality, ordering, and
//! rounding are exact — no binary floating-point ever touches a quoted
//! price or a traded amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use thiserror::Error;

/// Error constructing a [`Price`] or [`Amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must be strictly positive, got {0}")]
    NonPositive(Decimal),
}

/// A venue price, truncated to at most five significant digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    /// Round `value` to five significant digits and wrap it as a [`Price`].
    ///
    /// Returns an error if `value` is zero or negative — a book level's
    /// price is always strictly positive.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value <= Decimal::ZERO {
            return Err(PriceError::NonPositive(value));
        }
        Ok(Price(round_to_significant_figures(value, 5)))
    }

    /// The underlying decimal value.
    pub fn raw(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Decimal;
    fn mul(self, rhs: Decimal) -> Decimal {
        self.0 * rhs
    }
}

/// A traded or quoted amount. Sign encodes side where the caller's context
/// requires it (e.g. order-book level amounts: positive on the bid side,
/// negative on the ask side); elsewhere amounts are unsigned magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    pub fn raw(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Amount(self.0.abs())
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round to `precision` decimal places, the venue's per-pair amount precision.
    pub fn rounded_to(self, precision: u32) -> Self {
        Amount(self.0.round_dp(precision))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;
    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;
    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Amount {
    type Output = Amount;
    fn mul(self, rhs: Decimal) -> Amount {
        Amount(self.0 * rhs)
    }
}

impl Div<Decimal> for Amount {
    type Output = Amount;
    fn div(self, rhs: Decimal) -> Amount {
        Amount(self.0 / rhs)
    }
}

impl Neg for Amount {
    type Output = Amount;
    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

/// Round `value` to `sig_figs` significant digits, exactly, in decimal
/// arithmetic (no float intermediate).
pub fn round_to_significant_figures(value: Decimal, sig_figs: u32) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }
    let negative = value.is_sign_negative();
    let mut abs = value.abs();

    let mut magnitude: i32 = 0;
    if abs >= Decimal::ONE {
        while abs >= Decimal::TEN {
            abs /= Decimal::TEN;
            magnitude += 1;
        }
    } else {
        while abs < Decimal::ONE {
            abs *= Decimal::TEN;
            magnitude -= 1;
        }
    }

    let dp = sig_figs as i32 - 1 - magnitude;
    let rounded = if dp >= 0 {
        value.abs().round_dp(dp as u32)
    } else {
        let factor = pow10((-dp) as u32);
        (value.abs() / factor).round_dp(0) * factor
    };

    if negative {
        -rounded
    } else {
        rounded
    }
}

fn pow10(n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= Decimal::TEN;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_to_five_significant_digits() {
        assert_eq!(round_to_significant_figures(dec!(100.1049), 5), dec!(100.10));
        assert_eq!(round_to_significant_figures(dec!(100.1061), 5), dec!(100.11));
        assert_eq!(round_to_significant_figures(dec!(0.00012345), 5), dec!(0.00012345));
        assert_eq!(round_to_significant_figures(dec!(123456), 5), dec!(123460));
    }

    #[test]
    fn price_rejects_non_positive() {
        assert!(Price::new(dec!(0)).is_err());
        assert!(Price::new(dec!(-1)).is_err());
    }

    #[test]
    fn price_truncates_on_construction() {
        let p = Price::new(dec!(100.10499)).unwrap();
        assert_eq!(p.raw(), dec!(100.10));
    }

    #[test]
    fn amount_sign_round_trips() {
        let a = Amount::new(dec!(-5));
        assert!(a.is_negative());
        assert_eq!(a.abs().raw(), dec!(5));
    }
}
