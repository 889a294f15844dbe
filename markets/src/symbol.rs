//! Venue-formatted trading pair symbols.
//!
//! The engine treats a symbol as an opaque token handed to it by
//! configuration and handed back to the venue verbatim on every outbound
//! frame; the only operation the core needs is [`split`], a pure function
//! from the wire-format string to its `(base, quote)` halves.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

/// A venue-formatted trading pair, e.g. `"BTC/USD"`.
///
/// Symbols use an explicit `/` separator between base and quote rather than
/// a fixed-width or lookup-table scheme: it keeps [`split`] total and
/// dependency-free, at the cost of not matching any one venue's raw wire
/// format byte-for-byte (an adapter at the session boundary is expected to
/// translate to/from the venue's native spelling).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(SmolStr);

/// Error parsing or constructing a [`Symbol`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("symbol {0:?} is missing a '/' base/quote separator")]
    MissingSeparator(String),
    #[error("symbol {0:?} has an empty base or quote")]
    EmptyLeg(String),
}

impl Symbol {
    /// Construct a symbol from its base and quote currency codes.
    pub fn new(base: &str, quote: &str) -> Self {
        Symbol(SmolStr::new(format!("{base}/{quote}")))
    }

    /// Parse a venue-formatted symbol string, validating it splits cleanly.
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        split(raw)?;
        Ok(Symbol(SmolStr::new(raw)))
    }

    /// The venue-formatted wire representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The base currency leg.
    pub fn base(&self) -> &str {
        split(self.as_str()).expect("validated at construction").0
    }

    /// The quote currency leg.
    pub fn quote(&self) -> &str {
        split(self.as_str()).expect("validated at construction").1
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pure function splitting a venue-formatted symbol into `(base, quote)`.
///
/// This is the sole operation the core performs on a symbol; everything
/// else treats it as an opaque token.
pub fn split(symbol: &str) -> Result<(&str, &str), SymbolError> {
    let (base, quote) = symbol
        .split_once('/')
        .ok_or_else(|| SymbolError::MissingSeparator(symbol.to_string()))?;
    if base.is_empty() || quote.is_empty() {
        return Err(SymbolError::EmptyLeg(symbol.to_string()));
    }
    Ok((base, quote))
}
