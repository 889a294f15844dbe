use rust_decimal::Decimal;
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    #[error("session is not connected and authenticated, or is in maintenance")]
    NotReady,
    #[error("capability shortfall: orders.read/orders.write not both granted")]
    CapabilityShortfall,
    #[error("only {elapsed_ms}ms have elapsed since the last trading attempt, need {min_ms}ms")]
    IntervalNotElapsed { elapsed_ms: u64, min_ms: u64 },
    #[error("not all required book subscriptions are confirmed yet")]
    SubscriptionsNotReady,
    #[error("an order chain is already active")]
    ChainAlreadyActive,
    #[error("hop traded amount {amount} for {currency} is below the minimum order size {min}")]
    BelowMinOrderSize {
        currency: SmolStr,
        amount: Decimal,
        min: Decimal,
    },
}
