//! Cycle-Path Algorithm (§4.4): depth-first search for a profitable
//! closed walk through a filtered currency graph, evaluated hop-by-hop
//! against real book liquidity, fees, and precision.

use std::time::Duration;

use arbit_core::{Instruction, Solution};
use arbit_data::BookSnapshotSet;
use arbit_markets::{Amount, Price, Side, Symbol};
use arbit_risk::MinOrderSizeTable;
use rust_decimal::Decimal;
use smol_str::SmolStr;
use tracing::debug;

use crate::error::StrategyError;
use crate::shared::{pair_in_universe, usd_value};

/// Default hard wall-clock budget for one solve attempt (§4.4).
pub const DEFAULT_SOLVER_BUDGET: Duration = Duration::from_millis(850);

/// Everything the solver needs for one attempt; owned by the caller so the
/// book snapshot can be taken once and handed off to a blocking task.
#[derive(Debug, Clone)]
pub struct CycleInputs {
    pub books: BookSnapshotSet,
    pub base_currency: SmolStr,
    /// The max-volume currencies `C` — must include `base_currency`.
    pub universe: Vec<SmolStr>,
    pub starting_amount: Amount,
    pub min_path_length: usize,
    pub max_path_length: usize,
    pub min_profit_usd: Amount,
    pub taker_fee: Decimal,
    pub amount_precision: u32,
    pub min_order_size: MinOrderSizeTable,
}

#[derive(Debug, Clone)]
struct Edge {
    from: SmolStr,
    to: SmolStr,
    symbol: Symbol,
    side: Side,
    price: Price,
    /// Rate multiplying an input amount (in `from`) to a gross output
    /// amount (in `to`), before fees.
    rate: Decimal,
    /// The book's resting capacity at this top, expressed in the edge's
    /// input currency (`from`).
    capacity_in_input: Decimal,
}

#[derive(Debug, Clone)]
struct CandidateHop {
    edge: Edge,
    /// Unsigned base-currency order quantity for this hop.
    action_amount: Amount,
}

#[derive(Debug, Clone)]
struct Candidate {
    hops: Vec<CandidateHop>,
    profit_base: Decimal,
    profit_usd: Decimal,
}

fn build_edges(inputs: &CycleInputs) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (symbol, book) in inputs.books.iter() {
        if !pair_in_universe(symbol, &inputs.universe) {
            continue;
        }
        let base = SmolStr::new(symbol.base());
        let quote = SmolStr::new(symbol.quote());

        if let Some((ask_price, ask_amount)) = book.best_ask() {
            if !ask_price.raw().is_zero() {
                edges.push(Edge {
                    from: quote.clone(),
                    to: base.clone(),
                    symbol: symbol.clone(),
                    side: Side::Buy,
                    price: ask_price,
                    rate: Decimal::ONE / ask_price.raw(),
                    capacity_in_input: ask_amount.raw() * ask_price.raw(),
                });
            }
        }
        if let Some((bid_price, bid_amount)) = book.best_bid() {
            edges.push(Edge {
                from: base.clone(),
                to: quote.clone(),
                symbol: symbol.clone(),
                side: Side::Sell,
                price: bid_price,
                rate: bid_price.raw(),
                capacity_in_input: bid_amount.raw(),
            });
        }
    }
    edges
}

/// Depth-first enumeration of simple cycles through `base_currency`,
/// evaluating each one as it closes and keeping the best.
fn search(inputs: &CycleInputs, edges: &[Edge]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut path: Vec<&Edge> = Vec::new();
    let mut visited: Vec<&str> = vec![inputs.base_currency.as_str()];

    visit(
        inputs,
        edges,
        inputs.base_currency.as_str(),
        &mut path,
        &mut visited,
        &mut best,
    );
    best
}

fn visit<'e>(
    inputs: &CycleInputs,
    edges: &'e [Edge],
    current: &str,
    path: &mut Vec<&'e Edge>,
    visited: &mut Vec<&'e str>,
    best: &mut Option<Candidate>,
) {
    if path.len() == inputs.max_path_length {
        return;
    }
    for edge in edges.iter().filter(|e| e.from.as_str() == current) {
        if edge.to.as_str() == inputs.base_currency.as_str() {
            if path.len() + 1 >= inputs.min_path_length {
                path.push(edge);
                if let Some(candidate) = evaluate(inputs, path.as_slice()) {
                    if best
                        .as_ref()
                        .map(|b| candidate.profit_usd > b.profit_usd)
                        .unwrap_or(true)
                    {
                        *best = Some(candidate);
                    }
                }
                path.pop();
            }
            continue;
        }
        if visited.contains(&edge.to.as_str()) {
            continue;
        }
        path.push(edge);
        visited.push(edge.to.as_str());
        visit(inputs, edges, edge.to.as_str(), path, visited, best);
        path.pop();
        visited.pop();
    }
}

/// Evaluates one closed walk: computes the retroactively-capped starting
/// amount, then walks forward applying fees and precision rounding at
/// each hop (§4.4).
fn evaluate(inputs: &CycleInputs, path: &[&Edge]) -> Option<Candidate> {
    let one_minus_fee = Decimal::ONE - inputs.taker_fee;

    let mut cumulative_scale = Decimal::ONE;
    let mut bound_a0 = inputs.starting_amount.raw();
    for edge in path {
        if cumulative_scale.is_zero() {
            return None;
        }
        let max_a0_for_hop = edge.capacity_in_input / cumulative_scale;
        bound_a0 = bound_a0.min(max_a0_for_hop);
        cumulative_scale *= edge.rate * one_minus_fee;
    }
    if bound_a0 <= Decimal::ZERO {
        return None;
    }

    let mut amount = bound_a0;
    let mut hops = Vec::with_capacity(path.len());
    for edge in path.iter().copied() {
        let gross = amount * edge.rate;
        let action_amount = match edge.side {
            Side::Buy => Amount::new(gross).rounded_to(inputs.amount_precision),
            Side::Sell => Amount::new(amount).rounded_to(inputs.amount_precision),
        };
        if action_amount.is_zero() {
            return None;
        }
        let after_fee = Amount::new(gross * one_minus_fee).rounded_to(inputs.amount_precision);
        hops.push(CandidateHop {
            edge: edge.clone(),
            action_amount,
        });
        amount = after_fee.raw();
    }

    let profit_base = amount - bound_a0;
    if profit_base <= Decimal::ZERO {
        return None;
    }

    for hop in &hops {
        let currency = hop.edge.symbol.base();
        if inputs
            .min_order_size
            .check_hops(&[(SmolStr::new(currency), hop.action_amount.raw())])
            .is_err()
        {
            return None;
        }
    }

    let profit_usd = usd_value(&inputs.base_currency, profit_base, &inputs.books)?;
    if profit_usd < inputs.min_profit_usd.raw() {
        return None;
    }

    Some(Candidate {
        hops,
        profit_base,
        profit_usd,
    })
}

fn candidate_to_solution(candidate: Candidate) -> Solution {
    let instructions = candidate
        .hops
        .into_iter()
        .map(|hop| Instruction::Transition {
            symbol: hop.edge.symbol,
            side: hop.edge.side,
            action_price: hop.edge.price,
            action_amount: hop.action_amount,
        })
        .chain(std::iter::once(Instruction::End))
        .collect();
    Solution {
        instructions,
        estimated_profit_base: Amount::new(candidate.profit_base),
        estimated_profit_usd: Amount::new(candidate.profit_usd),
    }
}

/// Runs the search synchronously against a fixed book snapshot. Callers on
/// an async runtime should prefer [`solve_with_budget`].
pub fn solve(inputs: &CycleInputs) -> Result<Option<Solution>, StrategyError> {
    if !inputs
        .universe
        .iter()
        .any(|c| c.as_str() == inputs.base_currency.as_str())
    {
        return Err(StrategyError::BaseCurrencyNotInUniverse(
            inputs.base_currency.to_string(),
        ));
    }
    let edges = build_edges(inputs);
    let best = search(inputs, &edges);
    match best {
        Some(candidate) => {
            debug!(profit_usd = %candidate.profit_usd, hops = candidate.hops.len(), "admissible cycle found");
            Ok(Some(candidate_to_solution(candidate)))
        }
        None => Ok(None),
    }
}

/// Runs [`solve`] on a blocking thread under a hard wall-clock budget
/// (§4.4, default 850 ms); an overrun discards the attempt without error.
pub async fn solve_with_budget(
    inputs: CycleInputs,
    budget: Duration,
) -> Result<Option<Solution>, StrategyError> {
    let task = tokio::task::spawn_blocking(move || solve(&inputs));
    match tokio::time::timeout(budget, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(StrategyError::TaskFailed(join_err.to_string())),
        Err(_) => Err(StrategyError::BudgetExceeded(budget)),
    }
}
