//! Top-level error aggregate returned from the engine facade's `start()`
//! and `stop()` (§1.2). Lives here rather than in `arbit-core` because it
//! aggregates every downstream crate's error type and `arbit-core` is a
//! dependency of all of them — putting it there would be a cycle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("core domain error: {0}")]
    Core(#[from] arbit_core::CoreError),

    #[error("session error: {0}")]
    Execution(#[from] arbit_execution::ExecutionError),

    #[error("strategy solver error: {0}")]
    Strategy(#[from] arbit_strategies::StrategyError),

    #[error("risk gate error: {0}")]
    Risk(#[from] arbit_risk::RiskError),
}
