use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("starting currency {0:?} is not in the max-volume universe")]
    BaseCurrencyNotInUniverse(String),

    #[error("no route exists to price the cycle's profit in USD")]
    NoUsdReferencePrice,

    #[error("solver exceeded its {0:?} wall-clock budget")]
    BudgetExceeded(std::time::Duration),

    #[error("solver task panicked or was canceled: {0}")]
    TaskFailed(String),
}
