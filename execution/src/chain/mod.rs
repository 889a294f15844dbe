//! Order-Chain Coordinator (§4.5): drives a sequence of dependent
//! `new-order` requests through [`StepState`], compensating by cancellation
//! on partial failure.

use std::time::{Duration, Instant};

use arbit_core::{ClientId, ClientIdDate, EngineNotice, Instruction, Notification, Notifier, Order, OrderStatus, Solution, StepState};
use arbit_data::TradeStore;
use arbit_markets::{Amount, Price, Side, Symbol};
use arbit_integration::{NewOrderRequest, OutboundFrame};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Per-step deadline, large enough to allow a venue round-trip (§4.5).
pub const STEP_TIMEOUT: Duration = Duration::from_secs(15);

/// Hard cap on total chain wall-clock time before forced compensation.
pub const CHAIN_HARD_CAP: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
    Active,
    Compensating,
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub index: usize,
    pub symbol: Symbol,
    pub side: Side,
    pub action_price: Price,
    pub action_amount: Amount,
    pub client_id: Option<ClientId>,
    pub client_id_date: Option<ClientIdDate>,
    pub order_id: Option<u64>,
    pub state: StepState,
    pub submitted_at: Option<Instant>,
}

impl Step {
    fn new(index: usize, symbol: Symbol, side: Side, action_price: Price, action_amount: Amount) -> Self {
        Step {
            index,
            symbol,
            side,
            action_price,
            action_amount,
            client_id: None,
            client_id_date: None,
            order_id: None,
            state: StepState::Pending,
            submitted_at: None,
        }
    }

    fn transition(&mut self, next: StepState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            warn!(index = self.index, from = ?self.state, to = ?next, "rejected invalid step transition");
            false
        }
    }
}

#[derive(Debug)]
pub struct Chain {
    pub steps: Vec<Step>,
    pub status: ChainStatus,
    pub started_at: Instant,
    pub estimated_profit_usd: Amount,
}

impl Chain {
    fn from_solution(solution: &Solution) -> Self {
        let steps = solution
            .transitions()
            .enumerate()
            .filter_map(|(index, instruction)| match instruction {
                Instruction::Transition {
                    symbol,
                    side,
                    action_price,
                    action_amount,
                } => Some(Step::new(index, symbol.clone(), *side, *action_price, *action_amount)),
                Instruction::End => None,
            })
            .collect();
        Chain {
            steps,
            status: ChainStatus::Active,
            started_at: Instant::now(),
            estimated_profit_usd: solution.estimated_profit_usd,
        }
    }

    fn step_mut(&mut self, client_id: ClientId) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.client_id == Some(client_id))
    }

    fn is_terminal(&self) -> bool {
        matches!(self.status, ChainStatus::Done | ChainStatus::Failed)
    }
}

/// Drives at most one [`Chain`] at a time (§4.5 concurrency invariant).
#[allow(missing_debug_implementations)]
pub struct ChainCoordinator {
    outbound_tx: mpsc::UnboundedSender<OutboundFrame>,
    notifier: std::sync::Arc<dyn Notifier>,
    active: Option<Chain>,
}

impl ChainCoordinator {
    pub fn new(outbound_tx: mpsc::UnboundedSender<OutboundFrame>, notifier: std::sync::Arc<dyn Notifier>) -> Self {
        ChainCoordinator {
            outbound_tx,
            notifier,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.as_ref().map(|c| !c.is_terminal()).unwrap_or(false)
    }

    /// Starts a fresh chain from a solved cycle and submits step 0
    /// immediately (§9 open question a).
    pub fn enqueue(&mut self, solution: Solution) {
        let mut chain = Chain::from_solution(&solution);
        self.submit_step(&mut chain, 0);
        self.active = Some(chain);
    }

    fn submit_step(&mut self, chain: &mut Chain, index: usize) {
        let Some(step) = chain.steps.get_mut(index) else {
            self.finish(chain);
            return;
        };
        let client_id = ClientId::generate();
        let client_id_date = ClientIdDate::today();
        step.client_id = Some(client_id);
        step.client_id_date = Some(client_id_date);
        step.submitted_at = Some(Instant::now());
        step.transition(StepState::Submitted);

        let kind = "EXCHANGE LIMIT".to_string();
        let amount = match step.side {
            Side::Buy => step.action_amount.abs(),
            Side::Sell => -step.action_amount.abs(),
        };
        let request = NewOrderRequest {
            gid: None,
            cid: client_id.raw(),
            kind,
            symbol: step.symbol.as_str().to_string(),
            amount: amount.raw().to_string(),
            price: step.action_price.raw().to_string(),
            hidden: false,
        };
        let _ = self.outbound_tx.send(OutboundFrame::NewOrder(request));
    }

    /// Request-level ack (`on-req`). Advances `SUBMITTED -> ACK_REQ`, or
    /// fails the step if the venue rejected the request.
    pub fn handle_notification(&mut self, client_id: ClientId, notification: &Notification) {
        let failed = {
            let Some(chain) = self.active.as_mut() else { return };
            let Some(step) = chain.step_mut(client_id) else { return };
            if notification.is_error() {
                step.transition(StepState::Failed);
                true
            } else {
                step.transition(StepState::AckReq);
                false
            }
        };
        if failed {
            self.enter_compensation_if_needed();
        }
    }

    /// Order snapshot/update (`on`/`ou`). Binds the venue order id and
    /// advances `ACK_REQ -> ACK_ORDER`.
    pub fn handle_order_ack(&mut self, order: &Order) {
        let newly_executed = {
            let Some(chain) = self.active.as_mut() else { return };
            let Some(step) = chain.step_mut(order.client_id) else { return };
            step.order_id = order.id;
            step.transition(StepState::AckOrder);
            order.status == OrderStatus::Executed
        };
        if newly_executed {
            self.complete_step(order.client_id);
        }
    }

    /// Order close (`oc`). `EXECUTED` fills the step; any other close is
    /// treated as a venue-initiated cancel.
    pub fn handle_order_close(&mut self, order: &Order) {
        let executed = {
            let Some(chain) = self.active.as_mut() else { return };
            let Some(step) = chain.step_mut(order.client_id) else { return };
            if order.status == OrderStatus::Executed {
                true
            } else {
                step.transition(StepState::Canceled);
                false
            }
        };
        if executed {
            self.complete_step(order.client_id);
        } else {
            self.enter_compensation_if_needed();
        }
    }

    /// Checks cumulative trade fills against each `ACK_ORDER` step's
    /// target, completing any step that has reached it.
    pub fn poll_fills(&mut self, trades: &TradeStore) {
        let Some(chain) = self.active.as_ref() else { return };
        let filled: Vec<ClientId> = chain
            .steps
            .iter()
            .filter(|s| s.state == StepState::AckOrder)
            .filter_map(|s| {
                let client_id = s.client_id?;
                trades.is_fully_filled(client_id, s.action_amount).then_some(client_id)
            })
            .collect();
        for client_id in filled {
            self.complete_step(client_id);
        }
    }

    fn complete_step(&mut self, client_id: ClientId) {
        let next_index = {
            let Some(chain) = self.active.as_mut() else { return };
            let Some(step) = chain.step_mut(client_id) else { return };
            step.transition(StepState::Filled);
            step.index + 1
        };
        let Some(mut chain) = self.active.take() else { return };
        self.submit_step(&mut chain, next_index);
        self.active = Some(chain);
    }

    fn finish(&mut self, chain: &mut Chain) {
        chain.status = ChainStatus::Done;
        self.notifier.notify(&EngineNotice::ChainSubmitted {
            estimated_profit_usd: chain.estimated_profit_usd.raw(),
        });
        info!("chain completed successfully");
    }

    /// §5: per-step and whole-chain timeouts. A timed-out step may still
    /// have a resting order at the venue, so it gets an explicit cancel
    /// just like a compensation target, not merely a state transition.
    pub fn check_timeouts(&mut self, now: Instant) {
        let Some(chain) = self.active.as_ref() else { return };
        if chain.is_terminal() {
            return;
        }
        let hard_cap_hit = now.duration_since(chain.started_at) > CHAIN_HARD_CAP;
        let timed_out: Vec<usize> = chain
            .steps
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                s.state.is_live_at_venue()
                    && (hard_cap_hit
                        || s.submitted_at
                            .map(|at| now.duration_since(at) > STEP_TIMEOUT)
                            .unwrap_or(false))
            })
            .map(|(i, _)| i)
            .collect();
        if timed_out.is_empty() {
            return;
        }
        if hard_cap_hit {
            warn!("chain exceeded the 60s hard cap, compensating");
        }
        for index in timed_out {
            self.cancel_step(index);
        }
        self.enter_compensation_if_needed();
    }

    /// Sends a cancel for one step's resting order (by venue id if known,
    /// otherwise by client id) and marks it `CANCELED`.
    fn cancel_step(&mut self, index: usize) {
        let Some(chain) = self.active.as_mut() else { return };
        let Some(step) = chain.steps.get_mut(index) else { return };
        if !step.state.is_live_at_venue() {
            return;
        }
        let frame = match step.order_id {
            Some(id) => OutboundFrame::CancelById { id },
            None => match (step.client_id, step.client_id_date) {
                (Some(cid), Some(date)) => OutboundFrame::CancelByClientId {
                    cid: cid.raw(),
                    cid_date: date.to_string(),
                },
                _ => return,
            },
        };
        step.transition(StepState::Canceled);
        let _ = self.outbound_tx.send(frame);
    }

    /// If any step has failed or been canceled, cancels every remaining
    /// live step and settles the chain into `FAILED` (§4.5). Realized
    /// intermediate balances are left as-is — no auto-unwind.
    fn enter_compensation_if_needed(&mut self) {
        let Some(chain) = self.active.as_ref() else { return };
        if chain.is_terminal() {
            return;
        }
        let failed_index = chain
            .steps
            .iter()
            .find(|s| matches!(s.state, StepState::Failed | StepState::Canceled))
            .map(|s| s.index);
        let Some(failed_index) = failed_index else { return };

        let live: Vec<usize> = chain
            .steps
            .iter()
            .filter(|s| s.state.is_live_at_venue())
            .map(|s| s.index)
            .collect();
        let failed_symbol = chain.steps[failed_index].symbol.clone();

        {
            let chain = self.active.as_mut().expect("checked above");
            chain.status = ChainStatus::Compensating;
        }
        self.notifier.notify(&EngineNotice::ChainCompensating {
            symbol: failed_symbol,
            step_index: failed_index,
        });

        for index in live {
            self.cancel_step(index);
        }

        let chain = self.active.as_mut().expect("checked above");
        chain.status = ChainStatus::Failed;
        info!("chain failed; no further orders will be submitted");
    }
}
