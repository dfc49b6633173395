//! # Trading
//!
//! Random buy/sell cycles against a single AMM pool.
//!
//! [`controller::TradingLoop`] owns the cycle. Each cycle reads balances with
//! [`coins`], sizes the trade with [`amount`], picks a coin, builds the swap
//! with [`swap`] and submits it through the session's chain client.

/// Randomized trade sizing
pub mod amount;
/// Balances and coin selection
pub mod coins;
/// The trading state machine
pub mod controller;
/// Injectable randomness
pub mod entropy;
/// Swap transaction builders
pub mod swap;
/// Trade direction and intent
pub mod types;

#[cfg(test)]
mod test_helpers;

pub use controller::{CycleOutcome, LoopState, SkipReason, TradingLoop};
pub use entropy::{Entropy, OsEntropy};
pub use types::{Direction, TradeIntent};
