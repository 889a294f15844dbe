//! Operator notification hook.
//!
//! The engine does not own a channel to a human (§6, out of scope); it
//! only calls a [`Notifier`] with an [`EngineNotice`] at the handful of
//! moments an operator would want paged. Wiring that to Slack, email, or
//! anything else is a concern for the binary that constructs the engine.

use arbit_markets::Symbol;

/// A moment the engine considers notification-worthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineNotice {
    /// The venue reported a protocol version mismatch; the engine is stopping.
    FatalVersionMismatch { expected: u32, got: u32 },
    /// Authentication failed; trading is gated off until it succeeds.
    AuthenticationFailed { reason: String },
    /// The venue entered maintenance mode.
    MaintenanceEntered,
    /// The venue left maintenance mode.
    MaintenanceLeft,
    /// An order chain entered compensation after a step failed or was canceled.
    ChainCompensating { symbol: Symbol, step_index: usize },
    /// A profitable cycle was found and a chain was submitted.
    ChainSubmitted {
        estimated_profit_usd: rust_decimal::Decimal,
    },
}

/// Hook the engine calls out on at notification-worthy moments.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &EngineNotice);
}

/// A [`Notifier`] that discards every event; the default when no external
/// notification channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &EngineNotice) {}
}
