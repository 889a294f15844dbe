//! Inbound/outbound wire frame shapes (§6).
//!
//! Inbound frames arrive as either a JSON object (control events) or a
//! JSON array `[chan_id, msg_type, payload]` (data). We decode to
//! [`serde_json::Value`] first and dispatch on shape rather than writing a
//! single heterogeneous `Deserialize` impl — the array frames don't share a
//! tag field, so a derive can't express the split.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WireError;

/// Data-frame `msg_type` tags the core recognizes (§6, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgType {
    Heartbeat,
    Notification,
    WalletSnapshot,
    WalletUpdate,
    OrderSnapshot,
    OrderNew,
    OrderUpdate,
    OrderClose,
    OrderCloseRequest,
    TradeExecuted,
    TradeUpdate,
    Book,
    /// A tag the core doesn't know; logged and dropped per §9.
    Unknown(String),
}

impl MsgType {
    fn parse(raw: &str) -> Self {
        match raw {
            "hb" => MsgType::Heartbeat,
            "n" => MsgType::Notification,
            "ws" => MsgType::WalletSnapshot,
            "wu" => MsgType::WalletUpdate,
            "os" => MsgType::OrderSnapshot,
            "on" => MsgType::OrderNew,
            "ou" => MsgType::OrderUpdate,
            "oc" => MsgType::OrderClose,
            "oc-req" => MsgType::OrderCloseRequest,
            "te" => MsgType::TradeExecuted,
            "tu" => MsgType::TradeUpdate,
            other => MsgType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MsgType::Heartbeat => "hb",
            MsgType::Notification => "n",
            MsgType::WalletSnapshot => "ws",
            MsgType::WalletUpdate => "wu",
            MsgType::OrderSnapshot => "os",
            MsgType::OrderNew => "on",
            MsgType::OrderUpdate => "ou",
            MsgType::OrderClose => "oc",
            MsgType::OrderCloseRequest => "oc-req",
            MsgType::TradeExecuted => "te",
            MsgType::TradeUpdate => "tu",
            MsgType::Book => "book",
            MsgType::Unknown(s) => s.as_str(),
        };
        f.write_str(s)
    }
}

/// Trading capability matrix carried by a successful auth frame (§4.3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(rename = "orders.read", default)]
    pub orders_read: bool,
    #[serde(rename = "orders.write", default)]
    pub orders_write: bool,
}

impl Capabilities {
    /// Trading requires both read and write on the orders capability.
    pub fn can_trade(&self) -> bool {
        self.orders_read && self.orders_write
    }
}

/// `info` control frame. `code` is `None` for the initial handshake frame,
/// which carries only `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoFrame {
    pub version: Option<u32>,
    pub code: Option<u32>,
}

/// `auth` control frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthFrame {
    pub status: String,
    pub caps: Option<Capabilities>,
}

impl AuthFrame {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// `error` control frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorFrame {
    pub code: Option<i64>,
    pub msg: String,
}

/// A decoded inbound frame, tagged per §9's dynamic-payload mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Info(InfoFrame),
    Subscribed {
        channel: String,
        symbol: Option<String>,
        chan_id: u32,
    },
    Unsubscribed {
        chan_id: u32,
    },
    Auth(AuthFrame),
    Error(ErrorFrame),
    Data {
        chan_id: u32,
        msg_type: MsgType,
        payload: Value,
    },
}

/// Parses a raw wire message into a tagged [`InboundFrame`].
pub fn decode(raw: &str) -> Result<InboundFrame, WireError> {
    let value: Value = serde_json::from_str(raw)?;
    match &value {
        Value::Object(_) => decode_object(value),
        Value::Array(items) => decode_array(items),
        other => Err(WireError::UnrecognizedShape(other.to_string())),
    }
}

fn decode_object(value: Value) -> Result<InboundFrame, WireError> {
    let event = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| WireError::UnrecognizedShape(value.to_string()))?;

    match event {
        "info" => Ok(InboundFrame::Info(InfoFrame {
            version: value.get("version").and_then(Value::as_u64).map(|v| v as u32),
            code: value.get("code").and_then(Value::as_u64).map(|v| v as u32),
        })),
        "subscribed" => {
            let channel = value
                .get("channel")
                .and_then(Value::as_str)
                .ok_or_else(|| WireError::UnrecognizedShape(value.to_string()))?
                .to_string();
            let chan_id = value
                .get("chanId")
                .and_then(Value::as_u64)
                .ok_or_else(|| WireError::UnrecognizedShape(value.to_string()))?
                as u32;
            let symbol = value
                .get("symbol")
                .and_then(Value::as_str)
                .map(|s| s.to_string());
            Ok(InboundFrame::Subscribed {
                channel,
                symbol,
                chan_id,
            })
        }
        "unsubscribed" => {
            let chan_id = value
                .get("chanId")
                .and_then(Value::as_u64)
                .ok_or_else(|| WireError::UnrecognizedShape(value.to_string()))?
                as u32;
            Ok(InboundFrame::Unsubscribed { chan_id })
        }
        "auth" => {
            let status = value
                .get("status")
                .and_then(Value::as_str)
                .ok_or_else(|| WireError::UnrecognizedShape(value.to_string()))?
                .to_string();
            let caps = value
                .get("caps")
                .map(|c| serde_json::from_value(c.clone()))
                .transpose()?;
            Ok(InboundFrame::Auth(AuthFrame { status, caps }))
        }
        "error" => {
            let msg = value
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let code = value.get("code").and_then(Value::as_i64);
            Ok(InboundFrame::Error(ErrorFrame { code, msg }))
        }
        other => Err(WireError::UnknownEvent(other.to_string())),
    }
}

fn decode_array(items: &[Value]) -> Result<InboundFrame, WireError> {
    if items.len() < 2 {
        return Err(WireError::ArrayTooShort(format!("{items:?}")));
    }
    let chan_id = items[0]
        .as_u64()
        .ok_or_else(|| WireError::UnrecognizedShape(format!("{items:?}")))? as u32;

    // Channel-0 frames carry an explicit string tag (`[0,"wu",...]`); book
    // channels don't — their second element is the level payload itself
    // (`[chan_id,[price,count,amount]]` or a snapshot array of those).
    if let Some(tag) = items[1].as_str() {
        let msg_type = MsgType::parse(tag);
        let payload = items.get(2).cloned().unwrap_or(Value::Null);
        return Ok(InboundFrame::Data {
            chan_id,
            msg_type,
            payload,
        });
    }

    let payload = Value::Array(items[1..].to_vec());
    Ok(InboundFrame::Data {
        chan_id,
        msg_type: MsgType::Book,
        payload,
    })
}

/// A new-order request body (§6 outbound shape).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderRequest {
    pub gid: Option<u64>,
    pub cid: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub hidden: bool,
}

/// Outbound frames the session sends (§6).
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    Auth {
        api_key: String,
        auth_sig: String,
        auth_payload: String,
        auth_nonce: String,
        calc: i32,
    },
    SubscribeBook {
        symbol: String,
    },
    Unsubscribe {
        chan_id: u32,
    },
    NewOrder(NewOrderRequest),
    CancelById {
        id: u64,
    },
    CancelByClientId {
        cid: u64,
        cid_date: String,
    },
    CalcBalance {
        keys: Vec<String>,
    },
}

impl OutboundFrame {
    /// Serializes to the exact JSON shape the venue expects.
    pub fn to_value(&self) -> Value {
        match self {
            OutboundFrame::Auth {
                api_key,
                auth_sig,
                auth_payload,
                auth_nonce,
                calc,
            } => serde_json::json!({
                "event": "auth",
                "apiKey": api_key,
                "authSig": auth_sig,
                "authPayload": auth_payload,
                "authNonce": auth_nonce,
                "calc": calc,
            }),
            OutboundFrame::SubscribeBook { symbol } => serde_json::json!({
                "event": "subscribe",
                "channel": "book",
                "symbol": symbol,
                "prec": "P0",
                "freq": "F1",
                "len": "100",
            }),
            OutboundFrame::Unsubscribe { chan_id } => serde_json::json!({
                "event": "unsubscribe",
                "chanId": chan_id,
            }),
            OutboundFrame::NewOrder(req) => serde_json::json!([0, "on", null, req]),
            OutboundFrame::CancelById { id } => serde_json::json!([0, "oc", null, {"id": id}]),
            OutboundFrame::CancelByClientId { cid, cid_date } => {
                serde_json::json!([0, "oc", null, {"cid": cid, "cid_date": cid_date}])
            }
            OutboundFrame::CalcBalance { keys } => {
                let rows: Vec<[&String; 1]> = keys.iter().map(|k| [k]).collect();
                serde_json::json!([0, "calc", null, rows])
            }
        }
    }

    /// Serializes to the raw wire string.
    pub fn to_wire_string(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_info_frame() {
        let frame = decode(r#"{"event":"info","version":2}"#).unwrap();
        assert_eq!(
            frame,
            InboundFrame::Info(InfoFrame {
                version: Some(2),
                code: None,
            })
        );
    }

    #[test]
    fn decodes_subscribed_frame() {
        let frame =
            decode(r#"{"event":"subscribed","channel":"book","symbol":"tBTCUSD","chanId":5}"#)
                .unwrap();
        assert_eq!(
            frame,
            InboundFrame::Subscribed {
                channel: "book".to_string(),
                symbol: Some("tBTCUSD".to_string()),
                chan_id: 5,
            }
        );
    }

    #[test]
    fn decodes_auth_frame_with_capabilities() {
        let frame = decode(
            r#"{"event":"auth","status":"OK","caps":{"orders.read":true,"orders.write":true}}"#,
        )
        .unwrap();
        match frame {
            InboundFrame::Auth(auth) => {
                assert!(auth.is_success());
                assert!(auth.caps.unwrap().can_trade());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_heartbeat_with_no_payload() {
        let frame = decode(r#"[5,"hb"]"#).unwrap();
        assert_eq!(
            frame,
            InboundFrame::Data {
                chan_id: 5,
                msg_type: MsgType::Heartbeat,
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn decodes_book_data_frame() {
        let frame = decode(r#"[5,"wu",[100.1,1,-5]]"#).unwrap();
        match frame {
            InboundFrame::Data {
                chan_id, msg_type, ..
            } => {
                assert_eq!(chan_id, 5);
                assert_eq!(msg_type, MsgType::WalletUpdate);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_book_channel_level_without_a_tag() {
        let frame = decode(r#"[5,[100.1,1,5]]"#).unwrap();
        match frame {
            InboundFrame::Data {
                chan_id,
                msg_type,
                payload,
            } => {
                assert_eq!(chan_id, 5);
                assert_eq!(msg_type, MsgType::Book);
                assert_eq!(payload, serde_json::json!([100.1, 1, 5]));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn unknown_control_event_errors() {
        let err = decode(r#"{"event":"totally-unknown"}"#).unwrap_err();
        assert!(matches!(err, WireError::UnknownEvent(_)));
    }

    #[test]
    fn unknown_data_tag_is_preserved_for_caller_to_drop() {
        let frame = decode(r#"[5,"zz",[1,2]]"#).unwrap();
        match frame {
            InboundFrame::Data { msg_type, .. } => {
                assert_eq!(msg_type, MsgType::Unknown("zz".to_string()));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn outbound_subscribe_book_matches_wire_shape() {
        let frame = OutboundFrame::SubscribeBook {
            symbol: "tBTCUSD".to_string(),
        };
        let value = frame.to_value();
        assert_eq!(value["event"], "subscribe");
        assert_eq!(value["channel"], "book");
        assert_eq!(value["len"], "100");
    }

    #[test]
    fn outbound_new_order_is_an_array_frame() {
        let frame = OutboundFrame::NewOrder(NewOrderRequest {
            gid: None,
            cid: 42,
            kind: "EXCHANGE LIMIT".to_string(),
            symbol: "tBTCUSD".to_string(),
            amount: "0.01".to_string(),
            price: "100.10".to_string(),
            hidden: false,
        });
        let value = frame.to_value();
        assert!(value.is_array());
        assert_eq!(value[1], "on");
        assert_eq!(value[3]["cid"], 42);
    }

    #[test]
    fn outbound_cancel_by_client_id_matches_wire_shape() {
        let frame = OutboundFrame::CancelByClientId {
            cid: 7,
            cid_date: "2026-07-28".to_string(),
        };
        let value = frame.to_value();
        assert_eq!(value[3]["cid"], 7);
        assert_eq!(value[3]["cid_date"], "2026-07-28");
    }
}
