//! The five trading-loop preconditions (§4.6): a chain is only enqueued
//! when every guard passes, checked in a fixed order so the reported
//! reason is always the first one that actually blocks.

use std::time::Duration;

use fnv::FnvHashMap;
use rust_decimal::Decimal;
use smol_str::SmolStr;

use crate::check::{CheckAtLeast, RiskCheck};
use crate::error::RiskError;

/// Everything the trading loop knows about its own readiness, gathered
/// from the session, the subscription registry, and the chain
/// coordinator before a solve is even attempted. Kept free of those
/// crates' own types so `arbit-risk` stays a leaf dependency.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext {
    pub connected: bool,
    pub authenticated: bool,
    pub in_maintenance: bool,
    pub can_trade: bool,
    pub elapsed_since_last_attempt: Option<Duration>,
    pub min_trading_interval: Duration,
    pub all_books_ready: bool,
    pub chain_active: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TradingGuards;

impl TradingGuards {
    /// Runs all five guards in order, short-circuiting on the first one
    /// that fails.
    pub fn evaluate(&self, ctx: &GuardContext) -> Result<(), RiskError> {
        if !ctx.connected || !ctx.authenticated || ctx.in_maintenance {
            return Err(RiskError::NotReady);
        }
        if !ctx.can_trade {
            return Err(RiskError::CapabilityShortfall);
        }
        if let Some(elapsed) = ctx.elapsed_since_last_attempt {
            let check = CheckAtLeast::new(ctx.min_trading_interval);
            check.check(&elapsed).map_err(|e| RiskError::IntervalNotElapsed {
                elapsed_ms: e.input.as_millis() as u64,
                min_ms: e.minimum.as_millis() as u64,
            })?;
        }
        if !ctx.all_books_ready {
            return Err(RiskError::SubscriptionsNotReady);
        }
        if ctx.chain_active {
            return Err(RiskError::ChainAlreadyActive);
        }
        Ok(())
    }
}

/// Per-currency minimum order size table (§4.4 admissibility), with a
/// fallback for currencies that have no dedicated entry.
#[derive(Debug, Clone)]
pub struct MinOrderSizeTable {
    sizes: FnvHashMap<SmolStr, Decimal>,
    default: Decimal,
}

impl MinOrderSizeTable {
    pub fn new(default: Decimal) -> Self {
        MinOrderSizeTable {
            sizes: FnvHashMap::default(),
            default,
        }
    }

    pub fn insert(&mut self, currency: &str, minimum: Decimal) {
        self.sizes.insert(SmolStr::new(currency), minimum);
    }

    fn minimum_for(&self, currency: &str) -> Decimal {
        self.sizes.get(currency).copied().unwrap_or(self.default)
    }

    /// Validates every hop's traded base amount against its currency's
    /// minimum order size, failing on the first violation found.
    pub fn check_hops(&self, hops: &[(SmolStr, Decimal)]) -> Result<(), RiskError> {
        for (currency, amount) in hops {
            let minimum = self.minimum_for(currency);
            let check = CheckAtLeast::new(minimum);
            check
                .check(amount)
                .map_err(|e| RiskError::BelowMinOrderSize {
                    currency: currency.clone(),
                    amount: e.input,
                    min: e.minimum,
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ready_context() -> GuardContext {
        GuardContext {
            connected: true,
            authenticated: true,
            in_maintenance: false,
            can_trade: true,
            elapsed_since_last_attempt: Some(Duration::from_secs(1)),
            min_trading_interval: Duration::from_millis(500),
            all_books_ready: true,
            chain_active: false,
        }
    }

    #[test]
    fn passes_when_every_guard_is_satisfied() {
        let guards = TradingGuards;
        assert!(guards.evaluate(&ready_context()).is_ok());
    }

    #[test]
    fn blocks_when_not_connected_or_authenticated() {
        let guards = TradingGuards;
        let mut ctx = ready_context();
        ctx.authenticated = false;
        assert_eq!(guards.evaluate(&ctx), Err(RiskError::NotReady));
    }

    #[test]
    fn blocks_during_maintenance() {
        let guards = TradingGuards;
        let mut ctx = ready_context();
        ctx.in_maintenance = true;
        assert_eq!(guards.evaluate(&ctx), Err(RiskError::NotReady));
    }

    #[test]
    fn blocks_without_trading_capability() {
        let guards = TradingGuards;
        let mut ctx = ready_context();
        ctx.can_trade = false;
        assert_eq!(guards.evaluate(&ctx), Err(RiskError::CapabilityShortfall));
    }

    #[test]
    fn blocks_before_the_trading_interval_elapses() {
        let guards = TradingGuards;
        let mut ctx = ready_context();
        ctx.elapsed_since_last_attempt = Some(Duration::from_millis(100));
        let err = guards.evaluate(&ctx).unwrap_err();
        assert!(matches!(err, RiskError::IntervalNotElapsed { .. }));
    }

    #[test]
    fn blocks_when_subscriptions_are_not_confirmed() {
        let guards = TradingGuards;
        let mut ctx = ready_context();
        ctx.all_books_ready = false;
        assert_eq!(guards.evaluate(&ctx), Err(RiskError::SubscriptionsNotReady));
    }

    #[test]
    fn blocks_while_a_chain_is_active() {
        let guards = TradingGuards;
        let mut ctx = ready_context();
        ctx.chain_active = true;
        assert_eq!(guards.evaluate(&ctx), Err(RiskError::ChainAlreadyActive));
    }

    #[test]
    fn min_order_size_table_falls_back_to_its_default() {
        let mut table = MinOrderSizeTable::new(dec!(0.0001));
        table.insert("USD", dec!(10));
        let hops = vec![
            (SmolStr::new("USD"), dec!(15)),
            (SmolStr::new("BTC"), dec!(0.0005)),
        ];
        assert!(table.check_hops(&hops).is_ok());
    }

    #[test]
    fn min_order_size_table_rejects_a_hop_below_its_minimum() {
        let mut table = MinOrderSizeTable::new(dec!(0.0001));
        table.insert("USD", dec!(10));
        let hops = vec![(SmolStr::new("USD"), dec!(5))];
        let err = table.check_hops(&hops).unwrap_err();
        assert!(matches!(err, RiskError::BelowMinOrderSize { .. }));
    }
}
