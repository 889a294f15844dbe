#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Strategies
//!
//! The Cycle-Path Algorithm (§4.4): a depth-first search for profitable
//! closed currency cycles over a filtered subgraph of tracked books,
//! evaluated hop-by-hop against real liquidity, fees, and precision.

pub mod cycle;
pub mod error;
pub mod shared;

pub use cycle::{solve, solve_with_budget, CycleInputs, DEFAULT_SOLVER_BUDGET};
pub use error::StrategyError;
