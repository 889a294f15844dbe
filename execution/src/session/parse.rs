//! Decodes the `serde_json::Value` payload of a data frame into the typed
//! rows the stores expect. Prices and amounts are carried on the wire as
//! decimal strings (§6), never JSON numbers, so every numeric field here is
//! parsed from a string — no floating-point ever touches a quoted price.

use std::str::FromStr;

use arbit_core::{ClientId, ClientIdDate, Notification, NotificationStatus, Order, OrderStatus};
use arbit_core::{WalletBalance, WalletKey, WalletType};
use arbit_data::RawLevel;
use arbit_markets::{Amount, Price, Symbol};
use rust_decimal::Decimal;
use serde_json::Value;

fn decimal_field(row: &[Value], index: usize) -> Option<Decimal> {
    row.get(index)?.as_str().and_then(|s| Decimal::from_str(s).ok())
}

fn string_field(row: &[Value], index: usize) -> Option<String> {
    row.get(index)?.as_str().map(str::to_string)
}

fn u64_field(row: &[Value], index: usize) -> Option<u64> {
    row.get(index)?.as_u64()
}

/// Parses a book channel payload, which is either one level
/// `[price, count, amount]` or a snapshot array of such levels.
pub fn parse_book_levels(payload: &Value) -> Vec<RawLevel> {
    let rows: Vec<&Value> = match payload {
        Value::Array(items) if items.first().map(Value::is_array).unwrap_or(false) => {
            items.iter().collect()
        }
        Value::Array(_) => vec![payload],
        _ => return Vec::new(),
    };

    rows.into_iter()
        .filter_map(|row| {
            let row = row.as_array()?;
            let price = decimal_field(row, 0)?;
            let count = row.get(1)?.as_u64()? as u32;
            let amount = decimal_field(row, 2)?;
            Some(RawLevel {
                price: Price::new(price).ok()?,
                count,
                amount: Amount::new(amount),
            })
        })
        .collect()
}

/// Wallet row: `[WALLET_TYPE, CURRENCY, BALANCE, _, AVAILABLE_BALANCE]`.
pub fn parse_wallet_row(row: &Value) -> Option<(WalletKey, WalletBalance)> {
    let row = row.as_array()?;
    let wallet_type = WalletType::parse(&string_field(row, 0)?);
    let currency = string_field(row, 1)?;
    let balance = Amount::new(decimal_field(row, 2)?);
    let available = decimal_field(row, 4).map(Amount::new);
    Some((
        WalletKey::new(wallet_type, &currency),
        WalletBalance { balance, available },
    ))
}

/// Order row: `[id, cid, cid_date, gid, symbol, kind, amount_signed, price, status]`.
pub fn parse_order_row(row: &Value) -> Option<Order> {
    let row = row.as_array()?;
    let id = u64_field(row, 0);
    let client_id = ClientId::from_raw(u64_field(row, 1)?).ok()?;
    let client_id_date = string_field(row, 2)
        .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
        .map(ClientIdDate::new)
        .unwrap_or_else(ClientIdDate::today);
    let gid = u64_field(row, 3);
    let symbol = Symbol::parse(&string_field(row, 4)?).ok()?;
    let kind = smol_str::SmolStr::new(string_field(row, 5)?);
    let amount_signed = Amount::new(decimal_field(row, 6)?);
    let price = Price::new(decimal_field(row, 7)?).ok()?;
    let status = OrderStatus::parse(&string_field(row, 8)?)?;
    Some(Order {
        id,
        client_id,
        client_id_date,
        gid,
        symbol,
        kind,
        amount_signed,
        price,
        status,
    })
}

/// Trade row: `[trade_id, order_id, cid, exec_amount, exec_price]`.
/// Returns the client id it fills against and the signed executed amount.
pub fn parse_trade_row(row: &Value) -> Option<(ClientId, Amount)> {
    let row = row.as_array()?;
    let client_id = ClientId::from_raw(u64_field(row, 2)?).ok()?;
    let exec_amount = Amount::new(decimal_field(row, 3)?);
    Some((client_id, exec_amount))
}

/// Notification payload: `[mts, action, message_id, _, row, code, status, text]`.
pub fn parse_notification(payload: &Value) -> Option<Notification> {
    let items = payload.as_array()?;
    let action = items.get(1)?.as_str()?.to_string();
    let status_raw = items.get(6)?.as_str()?;
    let status = if status_raw.eq_ignore_ascii_case("SUCCESS") {
        NotificationStatus::Success
    } else {
        NotificationStatus::Error
    };
    let text = items.get(7).and_then(Value::as_str).unwrap_or_default().to_string();
    Some(Notification {
        action: smol_str::SmolStr::new(action),
        info: String::new(),
        status,
        text,
    })
}

/// The client id a notification's embedded order/trade row refers to, if any.
pub fn notification_client_id(payload: &Value) -> Option<ClientId> {
    let row = payload.as_array()?.get(4)?;
    if row.is_null() {
        return None;
    }
    let row = row.as_array()?;
    row.get(1).and_then(Value::as_u64).and_then(|raw| ClientId::from_raw(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_level() {
        let payload = serde_json::json!(["100.10", 1, "-5"]);
        let levels = parse_book_levels(&payload);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].count, 1);
    }

    #[test]
    fn parses_snapshot_array_of_levels() {
        let payload = serde_json::json!([["100.10", 1, "-5"], ["100.20", 2, "-10"]]);
        let levels = parse_book_levels(&payload);
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn parses_wallet_row() {
        let row = serde_json::json!(["exchange", "USD", "1000.5", null, "1000.5"]);
        let (key, balance) = parse_wallet_row(&row).unwrap();
        assert_eq!(key.currency.as_str(), "USD");
        assert!(balance.available.is_some());
    }

    #[test]
    fn parses_order_row() {
        let row = serde_json::json!([
            900_u64,
            42_u64,
            "2026-07-28",
            null,
            "BTC/USD",
            "EXCHANGE LIMIT",
            "0.01",
            "100.10",
            "ACTIVE"
        ]);
        let order = parse_order_row(&row).unwrap();
        assert_eq!(order.id, Some(900));
        assert_eq!(order.symbol.as_str(), "BTC/USD");
    }

    #[test]
    fn parses_notification_status() {
        let payload = serde_json::json!([
            0, "on-req", 0, null, null, null, "ERROR", "insufficient balance"
        ]);
        let note = parse_notification(&payload).unwrap();
        assert!(note.is_error());
        assert_eq!(note.action.as_str(), "on-req");
    }
}
