//! Order-chain step states and the solver's output shape.
//!
//! The state machine transitions themselves live with the coordinator that
//! drives them (`arbit-execution::chain`, since driving requires session
//! I/O); this module only defines the states and the data a solved cycle
//! hands to that coordinator.

use arbit_markets::{Amount, Price, Side, Symbol};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a single chain step (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    Pending,
    Submitted,
    AckReq,
    AckOrder,
    Filled,
    Canceled,
    Failed,
}

impl StepState {
    /// Terminal states end the step's lifecycle; no further transition is valid.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepState::Filled | StepState::Canceled | StepState::Failed
        )
    }

    /// Whether the step currently has an order resting at the venue that
    /// compensation would need to cancel.
    pub fn is_live_at_venue(self) -> bool {
        matches!(
            self,
            StepState::Submitted | StepState::AckReq | StepState::AckOrder
        )
    }

    /// Validates `self -> next` against the state machine in §4.5. `Failed`
    /// and `Canceled` are reachable from any non-terminal state (timeout,
    /// venue-initiated cancel); every other edge is the explicit forward path.
    pub fn can_transition_to(self, next: StepState) -> bool {
        use StepState::*;
        if self.is_terminal() {
            return false;
        }
        match next {
            Failed | Canceled => true,
            Submitted => self == Pending,
            AckReq => self == Submitted,
            AckOrder => self == AckReq,
            Filled => self == AckOrder,
            Pending => false,
        }
    }
}

/// One hop of a cycle: buy or sell the base currency of `symbol` at
/// `action_price` for `action_amount` (signed: positive buys, negative
/// sells — consistent with [`Side::of_signed_amount`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Transition {
        symbol: Symbol,
        side: Side,
        action_price: Price,
        action_amount: Amount,
    },
    End,
}

/// A profitable closed cycle the solver found, ready to be handed to the
/// order chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub instructions: Vec<Instruction>,
    pub estimated_profit_base: Amount,
    pub estimated_profit_usd: Amount,
}

impl Solution {
    /// The transition steps only, in execution order (drops the end marker).
    pub fn transitions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Transition { .. }))
    }
}
