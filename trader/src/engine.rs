//! Engine facade (§5 Lifecycle): wires the session controller, the
//! order-chain coordinator, the trading-loop guards, and the cycle solver
//! into the two operations the outside world gets, `start()`/`stop()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arbit_core::{AsyncShutdown, Notifier, WalletKey, WalletType};
use arbit_data::{PersistSink, SharedStores, PERSIST_INTERVAL_SECS};
use arbit_execution::{
    ChainCoordinator, ConnectionState, SessionConfig, SessionController, SessionOutput,
    SessionStatus,
};
use arbit_integration::OutboundFrame;
use arbit_markets::Amount;
use arbit_risk::{GuardContext, MinOrderSizeTable, TradingGuards};
use arbit_strategies::CycleInputs;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{
    SystemConfig, SHUTDOWN_POLL_INTERVAL, STARTUP_TRADING_DELAY, TRADING_FLAG_SAFETY_TIMEOUT,
};
use crate::error::EngineError;
use crate::wallet_limiter::{calc_key, WalletRecomputeLimiter};

/// Cadence for the housekeeping work that isn't on the venue/trading-tick
/// clock: chain timeouts, fill polling, wallet recompute dispatch.
const MAINTENANCE_TICK: Duration = Duration::from_millis(200);

#[allow(missing_debug_implementations)]
struct EngineTasks {
    session: JoinHandle<()>,
    trading: JoinHandle<()>,
}

/// Owns the running system. `start()` spins up the session and trading
/// loop as background tasks; `stop()` drains them per the Lifecycle
/// contract and returns once the venue has been told to unsubscribe
/// everything.
#[allow(missing_debug_implementations)]
pub struct Engine {
    config: SystemConfig,
    stores: SharedStores,
    notifier: Arc<dyn Notifier>,
    persist: Arc<dyn PersistSink>,
    trading_flag: Arc<AtomicBool>,
    outbound_tx: Option<mpsc::UnboundedSender<OutboundFrame>>,
    tasks: Option<EngineTasks>,
}

impl Engine {
    pub fn new(config: SystemConfig, notifier: Arc<dyn Notifier>, persist: Arc<dyn PersistSink>) -> Self {
        Engine {
            config,
            stores: SharedStores::new(),
            notifier,
            persist,
            trading_flag: Arc::new(AtomicBool::new(false)),
            outbound_tx: None,
            tasks: None,
        }
    }

    pub fn stores(&self) -> &SharedStores {
        &self.stores
    }

    /// Opens the venue connection, arms the supervisory reconnect timer
    /// (owned by [`SessionController::run`]), waits the startup delay,
    /// then starts the trading timer (§5 Lifecycle).
    pub async fn start(&mut self) -> Result<(), EngineError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut session = SessionController::new(
            self.session_config(),
            self.stores.clone(),
            self.notifier.clone(),
            events_tx,
        );
        let outbound_tx = session.outbound_handle();
        let status = session.status_handle();
        self.outbound_tx = Some(outbound_tx.clone());

        let session_task = tokio::spawn(async move {
            let err = session.run().await;
            warn!(error = %err, "session task stopped");
        });

        let trading_task = tokio::spawn(run_trading_loop(
            self.config.clone(),
            self.stores.clone(),
            self.notifier.clone(),
            self.persist.clone(),
            status,
            outbound_tx,
            events_rx,
            self.trading_flag.clone(),
        ));

        self.tasks = Some(EngineTasks {
            session: session_task,
            trading: trading_task,
        });
        Ok(())
    }

    /// Polls the trading flag until idle, unsubscribes every confirmed
    /// channel, then tears down the background tasks (§5 Lifecycle). Thin
    /// wrapper over [`AsyncShutdown::shutdown`] so the facade keeps the
    /// `start()`/`stop()` names the rest of the world calls (§6).
    pub async fn stop(&mut self) {
        self.shutdown().await
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            url: self.config.venue_url.clone(),
            api_key: self.config.api_key.clone(),
            api_secret: self.config.api_secret.clone(),
            required_symbols: self.config.required_symbols.clone(),
        }
    }
}

impl AsyncShutdown for Engine {
    type Result = ();

    /// Waits out any in-flight chain (the trading flag), unsubscribes every
    /// confirmed channel, then aborts the session and trading tasks.
    async fn shutdown(&mut self) -> Self::Result {
        while self.trading_flag.load(Ordering::SeqCst) {
            tokio::time::sleep(SHUTDOWN_POLL_INTERVAL).await;
        }

        if let Some(outbound_tx) = &self.outbound_tx {
            let chan_ids = self.stores.subscriptions.read().confirmed_chan_ids();
            for chan_id in chan_ids {
                let _ = outbound_tx.send(OutboundFrame::Unsubscribe { chan_id });
            }
        }

        if let Some(tasks) = self.tasks.take() {
            tasks.session.abort();
            tasks.trading.abort();
        }
        info!("engine stopped");
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_trading_loop(
    config: SystemConfig,
    stores: SharedStores,
    notifier: Arc<dyn Notifier>,
    persist: Arc<dyn PersistSink>,
    status: Arc<RwLock<SessionStatus>>,
    outbound_tx: mpsc::UnboundedSender<OutboundFrame>,
    mut events_rx: mpsc::UnboundedReceiver<SessionOutput>,
    trading_flag: Arc<AtomicBool>,
) {
    tokio::time::sleep(STARTUP_TRADING_DELAY).await;

    let calc_tx = outbound_tx.clone();
    let mut coordinator = ChainCoordinator::new(outbound_tx, notifier);
    let guards = TradingGuards;
    let mut min_order_size = MinOrderSizeTable::new(config.min_order_size_default);
    for (currency, minimum) in &config.min_order_size {
        min_order_size.insert(currency, *minimum);
    }
    let universe: Vec<SmolStr> = config.symbol_universe.iter().map(SmolStr::new).collect();
    let base_currency = config.base_currency();
    let base_wallet_key = WalletKey::new(WalletType::Exchange, base_currency.as_str());

    let mut last_attempt: Option<Instant> = None;
    let mut flag_acquired_at: Option<Instant> = None;
    let mut wallet_limiter = WalletRecomputeLimiter::new();

    let mut trading_ticker = tokio::time::interval(config.min_trading_interval());
    let mut maintenance_ticker = tokio::time::interval(MAINTENANCE_TICK);
    let mut persist_ticker =
        tokio::time::interval(Duration::from_secs(PERSIST_INTERVAL_SECS));

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    warn!("session event channel closed, trading loop stopping");
                    return;
                };
                match event {
                    SessionOutput::Notification { client_id, notification } => {
                        if let Some(client_id) = client_id {
                            coordinator.handle_notification(client_id, &notification);
                        }
                    }
                    SessionOutput::OrderAck(order) => coordinator.handle_order_ack(&order),
                    SessionOutput::OrderClose(order) => coordinator.handle_order_close(&order),
                }
            }

            _ = maintenance_ticker.tick() => {
                coordinator.check_timeouts(Instant::now());
                coordinator.poll_fills(&stores.trades.read());

                if !coordinator.is_active() && flag_acquired_at.take().is_some() {
                    trading_flag.store(false, Ordering::SeqCst);
                }
                if let Some(acquired_at) = flag_acquired_at {
                    if acquired_at.elapsed() > TRADING_FLAG_SAFETY_TIMEOUT {
                        warn!("trading flag safety timeout elapsed, releasing");
                        flag_acquired_at = None;
                        trading_flag.store(false, Ordering::SeqCst);
                    }
                }

                let stale: Vec<String> = stores
                    .wallets
                    .read()
                    .stale_keys()
                    .iter()
                    .map(calc_key)
                    .collect();
                if !stale.is_empty() {
                    for batch in wallet_limiter.admit_batches(&stale) {
                        let _ = calc_tx.send(OutboundFrame::CalcBalance { keys: batch });
                    }
                }
            }

            _ = persist_ticker.tick() => {
                let snapshot = stores.books.read().snapshot_for_solver();
                if let Err(err) = persist.persist_books(&snapshot).await {
                    warn!(error = %err, "book snapshot persistence failed");
                }
            }

            _ = trading_ticker.tick() => {
                let session_status = *status.read();
                let ctx = GuardContext {
                    connected: session_status.state != ConnectionState::Disconnected,
                    authenticated: session_status.state == ConnectionState::Authenticated,
                    in_maintenance: session_status.state == ConnectionState::Maintenance,
                    can_trade: session_status.can_trade,
                    elapsed_since_last_attempt: last_attempt.map(|at| at.elapsed()),
                    min_trading_interval: config.min_trading_interval(),
                    all_books_ready: stores.subscriptions.read().all_books_ready(&config.required_symbols),
                    chain_active: coordinator.is_active(),
                };
                if let Err(err) = guards.evaluate(&ctx) {
                    debug!(%err, "trading loop guard blocked this tick");
                    continue;
                }
                if trading_flag
                    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                    .is_err()
                {
                    continue;
                }
                flag_acquired_at = Some(Instant::now());
                last_attempt = Some(Instant::now());

                // a0 = min(A0, wallet_available(c0)); a stale or untracked
                // wallet cannot fund a cycle, so skip this tick entirely
                // rather than risk trading against a balance we don't trust.
                let available = stores.wallets.read().available(&base_wallet_key);
                let Some(available) = available else {
                    debug!(currency = %base_currency, "base currency wallet stale or untracked, skipping tick");
                    flag_acquired_at = None;
                    trading_flag.store(false, Ordering::SeqCst);
                    continue;
                };
                let starting_amount = Amount::new(config.max_amount).min(available);

                let books = stores.books.read().snapshot_for_solver();
                let inputs = CycleInputs {
                    books,
                    base_currency: base_currency.clone(),
                    universe: universe.clone(),
                    starting_amount,
                    min_path_length: config.min_path_length,
                    max_path_length: config.max_path_length,
                    min_profit_usd: Amount::new(config.min_path_profit_usd),
                    taker_fee: config.taker_fee,
                    amount_precision: config.amount_precision,
                    min_order_size: min_order_size.clone(),
                };

                match arbit_strategies::solve_with_budget(inputs, arbit_strategies::DEFAULT_SOLVER_BUDGET).await {
                    Ok(Some(solution)) => {
                        info!(
                            profit_usd = %solution.estimated_profit_usd.raw(),
                            "cycle found, enqueueing chain",
                        );
                        coordinator.enqueue(solution);
                    }
                    Ok(None) => {
                        flag_acquired_at = None;
                        trading_flag.store(false, Ordering::SeqCst);
                    }
                    Err(err) => {
                        warn!(error = %err, "solver attempt failed, releasing trading flag");
                        flag_acquired_at = None;
                        trading_flag.store(false, Ordering::SeqCst);
                    }
                }
            }
        }
    }
}
