//! Orders and venue notifications.

use arbit_markets::{Amount, Price, Symbol};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::client_id::{ClientId, ClientIdDate};

/// Lifecycle status of a venue order, as reported by order snapshot/update
/// frames (`os`/`on`/`ou`/`oc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    PartiallyFilled,
    Executed,
    Canceled,
    PostOnlyCanceled,
}

impl OrderStatus {
    /// Parses the venue's free-text status field, which may carry extra
    /// qualifiers (e.g. `"EXECUTED @ 100.1(5.0)"`) after the leading token.
    pub fn parse(raw: &str) -> Option<Self> {
        let head = raw.split_whitespace().next().unwrap_or(raw);
        match head {
            "ACTIVE" => Some(OrderStatus::Active),
            "PARTIALLY" | "PARTIALLY-FILLED" | "PARTIALLY_FILLED" => {
                Some(OrderStatus::PartiallyFilled)
            }
            "EXECUTED" => Some(OrderStatus::Executed),
            "CANCELED" => Some(OrderStatus::Canceled),
            "POSTONLY" | "POSTONLY-CANCELED" | "POSTONLY_CANCELED" => {
                Some(OrderStatus::PostOnlyCanceled)
            }
            _ => None,
        }
    }
}

/// A venue order, live or historical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Venue-assigned order id; absent until the venue acknowledges the order.
    pub id: Option<u64>,
    pub client_id: ClientId,
    pub client_id_date: ClientIdDate,
    /// Group id tying this order to others in the same chain, if any.
    pub gid: Option<u64>,
    pub symbol: Symbol,
    /// Venue-defined order type token, e.g. `"EXCHANGE LIMIT"`.
    pub kind: SmolStr,
    /// Signed order size: positive buys the base currency, negative sells it.
    pub amount_signed: Amount,
    pub price: Price,
    pub status: OrderStatus,
}

/// Whether a venue notification reports success or failure of the action it
/// acknowledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    Success,
    Error,
}

/// An `n` (notification) frame, acknowledging a request-level action such as
/// `on-req` (new order request) or `oc-req` (cancel request).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// The action being acknowledged, e.g. `"on-req"` or `"oc-req"`.
    pub action: SmolStr,
    /// Free-form venue info string describing what happened.
    pub info: String,
    pub status: NotificationStatus,
    pub text: String,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.status == NotificationStatus::Error
    }
}
