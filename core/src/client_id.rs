//! Caller-generated order identifiers.
//!
//! A [`ClientId`] is unique only within the UTC day named by its paired
//! [`ClientIdDate`]; the order chain regenerates a fresh id on every
//! (re)transmission so retransmits never collide with the original.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A 45-bit random client order id, the range the venue's wire format allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(u64);

const MAX_CLIENT_ID: u64 = (1u64 << 45) - 1;

impl ClientId {
    /// Generate a fresh random client id in `[0, 2^45)`.
    pub fn generate() -> Self {
        let raw = rand::rng().random_range(0..=MAX_CLIENT_ID);
        ClientId(raw)
    }

    /// Wrap a raw value, validating it fits the 45-bit range.
    pub fn from_raw(raw: u64) -> Result<Self, CoreError> {
        if raw > MAX_CLIENT_ID {
            return Err(CoreError::ClientIdOutOfRange(raw));
        }
        Ok(ClientId(raw))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The UTC calendar day a [`ClientId`] was minted on, formatted `YYYY-MM-DD`
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientIdDate(NaiveDate);

impl ClientIdDate {
    /// Wrap an explicit calendar date, e.g. one parsed back off the wire.
    pub fn new(date: NaiveDate) -> Self {
        ClientIdDate(date)
    }

    /// Today, in UTC.
    pub fn today() -> Self {
        ClientIdDate(Utc::now().date_naive())
    }

    pub fn inner(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ClientIdDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_fit_45_bits() {
        for _ in 0..1000 {
            let id = ClientId::generate();
            assert!(id.raw() <= MAX_CLIENT_ID);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(ClientId::from_raw(MAX_CLIENT_ID + 1).is_err());
        assert!(ClientId::from_raw(MAX_CLIENT_ID).is_ok());
    }

    #[test]
    fn date_formats_as_iso() {
        let date = ClientIdDate(NaiveDate::from_ymd_opt(2026, 7, 28).unwrap());
        assert_eq!(date.to_string(), "2026-07-28");
    }
}
