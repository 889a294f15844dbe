//! Session Controller (§4.3): owns the single websocket connection, the
//! authentication handshake, maintenance-mode handling, and reconnect +
//! resubscribe.

mod config;
mod parse;

pub use config::{SessionConfig, API_VERSION, RECONNECT_INTERVAL_MS};

use std::time::Duration;

use arbit_core::{ClientId, EngineNotice, Notification, Notifier, Order};
use arbit_data::{SharedStores, SubscriptionRequest};
use arbit_integration::{self as wire, InboundFrame, MsgType, OutboundFrame};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

use crate::error::ExecutionError;

/// Info codes the venue uses to signal maintenance transitions (§4.3).
const INFO_CODE_RESTART: u32 = 20051;
const INFO_CODE_MAINTENANCE_ENTER: u32 = 20060;
const INFO_CODE_MAINTENANCE_LEAVE: u32 = 20061;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    Authenticated,
    Maintenance,
}

/// Outcome of one pass through the session's inbound-frame handling,
/// surfaced to the trading loop so it can gate on connection health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Continue,
    FatalVersionMismatch,
    /// Leaving maintenance mode: the venue expects a clean re-auth and a
    /// fresh round of book subscriptions (§4.3).
    ResubscribeBooks,
}

/// An order-lifecycle event the chain coordinator needs to see, forwarded
/// out of the session task as it's observed (§4.5 bridges to this via the
/// owning engine facade, which owns both the session and the coordinator).
#[derive(Debug, Clone)]
pub enum SessionOutput {
    Notification {
        client_id: Option<ClientId>,
        notification: Notification,
    },
    OrderAck(Order),
    OrderClose(Order),
}

/// A snapshot of connection health cheap enough for another task (the
/// trading loop) to poll before every guard evaluation (§4.6).
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStatus {
    pub state: ConnectionState,
    pub can_trade: bool,
}

#[allow(missing_debug_implementations)]
pub struct SessionController {
    config: SessionConfig,
    notifier: std::sync::Arc<dyn Notifier>,
    stores: SharedStores,
    state: ConnectionState,
    caps: Option<wire::Capabilities>,
    outbound_tx: mpsc::UnboundedSender<OutboundFrame>,
    outbound_rx: mpsc::UnboundedReceiver<OutboundFrame>,
    events_tx: mpsc::UnboundedSender<SessionOutput>,
    status: std::sync::Arc<RwLock<SessionStatus>>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        stores: SharedStores,
        notifier: std::sync::Arc<dyn Notifier>,
        events_tx: mpsc::UnboundedSender<SessionOutput>,
    ) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        SessionController {
            config,
            notifier,
            stores,
            state: ConnectionState::Disconnected,
            caps: None,
            outbound_tx,
            outbound_rx,
            events_tx,
            status: std::sync::Arc::new(RwLock::new(SessionStatus::default())),
        }
    }

    /// A sender other components (the chain coordinator) use to queue
    /// outbound frames without borrowing the controller itself.
    pub fn outbound_handle(&self) -> mpsc::UnboundedSender<OutboundFrame> {
        self.outbound_tx.clone()
    }

    /// A read handle onto this session's connection health, safe to poll
    /// from the task that owns the trading loop.
    pub fn status_handle(&self) -> std::sync::Arc<RwLock<SessionStatus>> {
        self.status.clone()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn can_trade(&self) -> bool {
        self.state == ConnectionState::Authenticated
            && self.caps.map(|c| c.can_trade()).unwrap_or(false)
    }

    fn sync_status(&self) {
        *self.status.write() = SessionStatus {
            state: self.state,
            can_trade: self.can_trade(),
        };
    }

    /// Runs the connect/auth/subscribe/read loop forever, reconnecting on
    /// every disconnect per the supervisory timer (§4.3). Returns only on
    /// a fatal protocol-version mismatch (§7, §8 scenario 6).
    pub async fn run(&mut self) -> ExecutionError {
        loop {
            match self.run_once().await {
                Err(err @ ExecutionError::VersionMismatch { .. }) => {
                    error!(error = %err, "fatal protocol mismatch, session stopping");
                    self.state = ConnectionState::Disconnected;
                    self.sync_status();
                    return err;
                }
                Err(err) => warn!(error = %err, "session connection ended, reconnecting"),
                Ok(()) => {}
            }
            self.stores.subscriptions.write().clear();
            self.stores.wallets.write().mark_all_stale();
            self.state = ConnectionState::Disconnected;
            self.sync_status();
            tokio::time::sleep(Duration::from_millis(RECONNECT_INTERVAL_MS)).await;
        }
    }

    async fn run_once(&mut self) -> Result<(), ExecutionError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(self.config.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();
        self.state = ConnectionState::Connected;
        self.caps = None;
        self.sync_status();
        info!(url = %self.config.url, "session connected");

        self.send_auth(&mut write).await?;
        for symbol in self.config.required_symbols.clone() {
            self.subscribe_book(&mut write, symbol).await?;
        }

        loop {
            tokio::select! {
                frame = read.next() => {
                    let Some(frame) = frame else {
                        info!("session stream closed");
                        return Ok(());
                    };
                    let message = frame?;
                    let Message::Text(text) = message else { continue };
                    match self.handle_inbound(&text) {
                        SessionEvent::FatalVersionMismatch => {
                            return Err(ExecutionError::VersionMismatch {
                                expected: API_VERSION,
                                got: 0,
                            });
                        }
                        SessionEvent::ResubscribeBooks => {
                            self.send_auth(&mut write).await?;
                            for symbol in self.config.required_symbols.clone() {
                                self.subscribe_book(&mut write, symbol).await?;
                            }
                        }
                        SessionEvent::Continue => {}
                    }
                }
                outbound = self.outbound_rx.recv() => {
                    let Some(outbound) = outbound else {
                        return Err(ExecutionError::OutboundChannelClosed);
                    };
                    write.send(Message::Text(outbound.to_wire_string().into())).await?;
                }
            }
        }
    }

    async fn send_auth<W>(&self, write: &mut W) -> Result<(), ExecutionError>
    where
        W: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        let nonce = wire::nonce_now();
        let sig = wire::sign_auth_payload(&self.config.api_secret, &nonce);
        let frame = OutboundFrame::Auth {
            api_key: self.config.api_key.clone(),
            auth_sig: sig,
            auth_payload: nonce.clone(),
            auth_nonce: nonce,
            calc: 1,
        };
        write.send(Message::Text(frame.to_wire_string().into())).await?;
        Ok(())
    }

    async fn subscribe_book<W>(
        &self,
        write: &mut W,
        symbol: arbit_markets::Symbol,
    ) -> Result<(), ExecutionError>
    where
        W: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        self.stores
            .subscriptions
            .write()
            .add(SubscriptionRequest::book(symbol.clone()), symbol.clone());
        let frame = OutboundFrame::SubscribeBook {
            symbol: symbol.as_str().to_string(),
        };
        write.send(Message::Text(frame.to_wire_string().into())).await?;
        Ok(())
    }

    fn handle_inbound(&mut self, raw: &str) -> SessionEvent {
        let frame = match wire::frames::decode(raw) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "dropping malformed frame");
                return SessionEvent::Continue;
            }
        };

        match frame {
            InboundFrame::Info(info) => self.handle_info(info),
            InboundFrame::Subscribed {
                channel,
                symbol,
                chan_id,
            } => {
                let symbol = symbol.and_then(|s| arbit_markets::Symbol::parse(&s).ok());
                self.stores
                    .subscriptions
                    .write()
                    .confirm(&channel, symbol.as_ref(), chan_id);
                SessionEvent::Continue
            }
            InboundFrame::Unsubscribed { chan_id } => {
                self.stores.subscriptions.write().remove(chan_id);
                SessionEvent::Continue
            }
            InboundFrame::Auth(auth) => {
                if auth.is_success() {
                    self.state = ConnectionState::Authenticated;
                    self.caps = auth.caps;
                    self.sync_status();
                    if !self.can_trade() {
                        warn!("authenticated without full orders.read/orders.write capability");
                    }
                } else {
                    self.notifier.notify(&EngineNotice::AuthenticationFailed {
                        reason: auth.status,
                    });
                }
                SessionEvent::Continue
            }
            InboundFrame::Error(err) => {
                warn!(code = ?err.code, msg = %err.msg, "venue reported an error frame");
                SessionEvent::Continue
            }
            InboundFrame::Data {
                chan_id,
                msg_type,
                payload,
            } => {
                self.handle_data(chan_id, msg_type, &payload);
                SessionEvent::Continue
            }
        }
    }

    fn handle_info(&mut self, info: wire::InfoFrame) -> SessionEvent {
        if let Some(version) = info.version {
            if version != API_VERSION {
                self.notifier.notify(&EngineNotice::FatalVersionMismatch {
                    expected: API_VERSION,
                    got: version,
                });
                error!(expected = API_VERSION, got = version, "fatal protocol version mismatch");
                return SessionEvent::FatalVersionMismatch;
            }
        }
        match info.code {
            Some(INFO_CODE_RESTART) => {
                info!("venue requested restart, treating as disconnect");
                self.state = ConnectionState::Disconnected;
                self.sync_status();
            }
            Some(INFO_CODE_MAINTENANCE_ENTER) => {
                self.state = ConnectionState::Maintenance;
                self.sync_status();
                self.notifier.notify(&EngineNotice::MaintenanceEntered);
            }
            Some(INFO_CODE_MAINTENANCE_LEAVE) => {
                self.notifier.notify(&EngineNotice::MaintenanceLeft);
                self.stores.subscriptions.write().clear();
                self.state = ConnectionState::Connected;
                self.sync_status();
                return SessionEvent::ResubscribeBooks;
            }
            _ => {}
        }
        SessionEvent::Continue
    }

    #[cfg(test)]
    fn test_instance() -> Self {
        let (events_tx, _events_rx) = mpsc::unbounded_channel();
        SessionController::new(
            SessionConfig {
                url: "wss://example.invalid/ws".parse().unwrap(),
                api_key: String::new(),
                api_secret: String::new(),
                required_symbols: Vec::new(),
            },
            SharedStores::new(),
            std::sync::Arc::new(arbit_core::NullNotifier),
            events_tx,
        )
    }

    fn handle_data(&mut self, chan_id: u32, msg_type: MsgType, payload: &serde_json::Value) {
        if chan_id == 0 {
            self.handle_channel_zero(msg_type, payload);
            return;
        }
        if msg_type == MsgType::Heartbeat {
            return;
        }
        let levels = parse::parse_book_levels(payload);
        if levels.is_empty() {
            return;
        }
        let Some(symbol) = self
            .stores
            .subscriptions
            .read()
            .dispatch(chan_id)
            .cloned()
        else {
            warn!(chan_id, "book update for an unknown channel, dropping");
            return;
        };
        let mut books = self.stores.books.write();
        if levels.len() == 1 {
            books.apply_delta(&symbol, levels[0].price, levels[0].count, levels[0].amount);
        } else {
            books.apply_snapshot(&symbol, &levels);
        }
    }

    fn handle_channel_zero(&mut self, msg_type: MsgType, payload: &serde_json::Value) {
        match msg_type {
            MsgType::Heartbeat => {}
            MsgType::WalletSnapshot | MsgType::WalletUpdate => {
                let rows: Vec<&serde_json::Value> = match payload {
                    serde_json::Value::Array(items)
                        if items.first().map(serde_json::Value::is_array).unwrap_or(false) =>
                    {
                        items.iter().collect()
                    }
                    serde_json::Value::Array(_) => vec![payload],
                    _ => Vec::new(),
                };
                let mut wallets = self.stores.wallets.write();
                for row in rows {
                    if let Some((key, balance)) = parse::parse_wallet_row(row) {
                        wallets.upsert(key, balance);
                    }
                }
            }
            MsgType::OrderSnapshot | MsgType::OrderNew | MsgType::OrderUpdate => {
                if let Some(order) = parse::parse_order_row(payload) {
                    self.stores.orders.write().upsert(order.clone());
                    let _ = self.events_tx.send(SessionOutput::OrderAck(order));
                }
            }
            MsgType::OrderClose => {
                if let Some(order) = parse::parse_order_row(payload) {
                    self.stores.orders.write().upsert(order.clone());
                    let _ = self.events_tx.send(SessionOutput::OrderClose(order));
                }
            }
            MsgType::TradeExecuted | MsgType::TradeUpdate => {
                if let Some((client_id, amount)) = parse::parse_trade_row(payload) {
                    self.stores.trades.write().record_fill(client_id, amount);
                }
            }
            MsgType::Notification => {
                if let Some(notification) = parse::parse_notification(payload) {
                    let client_id = parse::notification_client_id(payload);
                    let _ = self.events_tx.send(SessionOutput::Notification {
                        client_id,
                        notification,
                    });
                }
            }
            _ => {}
        }
    }
}
