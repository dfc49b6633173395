//! The trading loop.
//!
//! A two-state machine. [`TradingLoop::step`] runs exactly one cycle against
//! the chain and reports what happened; [`TradingLoop::run`] drives it with a
//! randomized pause between cycles until the primary balance runs low.

use std::time::Duration;

use derive_more::Display;
use log::{error, info, warn};

use super::amount::choose_amount;
use super::coins::{fetch_balances, find_coin, format_primary, Balances};
use super::entropy::Entropy;
use super::swap::build_from_intent;
use super::types::{Direction, TradeIntent};
use crate::sui::{ChainClient, ExecutionStatus};
use crate::utils::app_context::AppContext;
use crate::utils::constants::MIN_AMOUNT_OUT;

/// Lifecycle of the loop; `Stopped` is terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Cycles keep running
    Running,
    /// Primary balance fell below the threshold
    Stopped,
}

/// Why a cycle ended without submitting anything
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum SkipReason {
    /// The randomized amount rounded down to zero
    #[display("amount rounds to zero")]
    ZeroAmount,
    /// No single coin covers the amount
    #[display("no coin large enough")]
    NoCoin,
    /// Nothing to sell
    #[display("balance is empty")]
    EmptyBalance,
}

/// Result of one cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The loop is stopped; nothing was attempted
    Stopped,
    /// Ordinary no-op cycle
    Skipped {
        /// Chosen side
        direction: Direction,
        /// Why nothing was submitted
        reason: SkipReason,
    },
    /// A swap executed successfully
    Traded {
        /// Side traded
        direction: Direction,
        /// Input amount in base units
        amount: u64,
        /// Transaction digest
        digest: String,
    },
    /// A query or submission failed; absorbed, the loop keeps running
    Failed {
        /// Side, when the failure came after the coin flip
        direction: Option<Direction>,
        /// Error message
        error: String,
    },
}

/// Drives trades for one [`AppContext`].
pub struct TradingLoop<'a, C, E> {
    /// Session
    ctx: &'a AppContext<C>,
    /// Source of every random decision
    entropy: E,
    /// Current state
    state: LoopState,
    /// Cycles started so far
    cycles: u64,
}

impl<'a, C: ChainClient, E: Entropy> TradingLoop<'a, C, E> {
    /// A loop in the `Running` state.
    pub fn new(ctx: &'a AppContext<C>, entropy: E) -> Self {
        Self {
            ctx,
            entropy,
            state: LoopState::Running,
            cycles: 0,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of cycles started
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs one cycle. Every error is logged and folded into the outcome.
    pub async fn step(&mut self) -> CycleOutcome {
        if self.state == LoopState::Stopped {
            return CycleOutcome::Stopped;
        }
        self.cycles += 1;
        info!("trade::loop: Transaction #{} started", self.cycles);

        let balances = match fetch_balances(self.ctx).await {
            Ok(balances) => balances,
            Err(e) => {
                error!("trade::loop: Failed to fetch balances: {e:#}");
                return CycleOutcome::Failed {
                    direction: None,
                    error: format!("{e:#}"),
                };
            }
        };
        info!(
            "trade::loop: Balances: VRAM {}, ANAM01 {}",
            format_primary(balances.primary),
            balances.secondary
        );

        if balances.primary < self.ctx.policy.min_primary_balance {
            warn!("trade::loop: VRAM balance below threshold, stopping");
            self.state = LoopState::Stopped;
            return CycleOutcome::Stopped;
        }

        let direction = if self.entropy.coin_flip() {
            Direction::Buy
        } else {
            Direction::Sell
        };

        let intent = match self.plan(direction, balances).await {
            Ok(Ok(intent)) => intent,
            Ok(Err(reason)) => {
                info!("trade::loop: Skipping {direction}: {reason}");
                return CycleOutcome::Skipped { direction, reason };
            }
            Err(e) => {
                error!("trade::loop: Failed to select a coin for {direction}: {e:#}");
                return CycleOutcome::Failed {
                    direction: Some(direction),
                    error: format!("{e:#}"),
                };
            }
        };

        self.submit(intent).await
    }

    /// Draws the pause before the next cycle.
    pub fn next_delay(&mut self) -> Duration {
        let policy = &self.ctx.policy;
        Duration::from_millis(
            self.entropy
                .pick_inclusive(policy.min_delay_ms, policy.max_delay_ms),
        )
    }

    /// Runs until the loop stops.
    pub async fn run(&mut self) {
        self.run_for(None).await;
    }

    /// Runs until the loop stops or `max_cycles` cycles have been started.
    ///
    /// The pause follows every cycle that did not stop the loop, except the
    /// last one of a bounded run.
    pub async fn run_for(&mut self, max_cycles: Option<u64>) {
        loop {
            if self.step().await == CycleOutcome::Stopped {
                break;
            }
            if max_cycles.is_some_and(|max| self.cycles >= max) {
                info!("trade::loop: Reached {} cycles", self.cycles);
                break;
            }
            let delay = self.next_delay();
            info!("trade::loop: Waiting {} ms...", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    /// Turns a direction into a trade intent, or the reason to skip.
    ///
    /// The outer error is a failed coin query.
    async fn plan(
        &mut self,
        direction: Direction,
        balances: Balances,
    ) -> eyre::Result<Result<TradeIntent, SkipReason>> {
        let policy = self.ctx.policy;
        let pool = &self.ctx.pool;

        let (amount_in, coin_type) = match direction {
            Direction::Buy => {
                let amount = choose_amount(
                    balances.primary,
                    policy.min_percent,
                    policy.max_percent,
                    &mut self.entropy,
                );
                if amount == 0 {
                    return Ok(Err(SkipReason::ZeroAmount));
                }
                (amount, pool.primary_coin_type())
            }
            Direction::Sell => {
                if balances.secondary == 0 {
                    return Ok(Err(SkipReason::EmptyBalance));
                }
                let amount = choose_amount(
                    balances.secondary,
                    policy.min_percent,
                    policy.max_percent,
                    &mut self.entropy,
                );
                (amount.max(1), pool.secondary_coin_type())
            }
        };

        let coin = find_coin(&self.ctx.client, &self.ctx.address, &coin_type, amount_in).await?;
        Ok(coin
            .map(|coin_id| TradeIntent {
                direction,
                amount_in,
                min_amount_out: MIN_AMOUNT_OUT,
                coin_id,
            })
            .ok_or(SkipReason::NoCoin))
    }

    /// Builds, signs and submits the trade.
    async fn submit(&self, intent: TradeIntent) -> CycleOutcome {
        let direction = intent.direction;
        let failed = |error: String| {
            error!("trade::loop: {direction} failed: {error}");
            CycleOutcome::Failed {
                direction: Some(direction),
                error,
            }
        };

        let tx = match build_from_intent(&self.ctx.pool, &intent, self.ctx.address) {
            Ok(tx) => tx,
            Err(e) => return failed(format!("{e:#}")),
        };
        let result = match self.ctx.client.sign_and_execute(&self.ctx.keypair, tx).await {
            Ok(result) => result,
            Err(e) => return failed(format!("{e:#}")),
        };

        match result.status {
            ExecutionStatus::Success => {
                match direction {
                    Direction::Buy => info!(
                        "trade::loop: Buy succeeded, spent {} VRAM, digest {}",
                        format_primary(intent.amount_in),
                        result.digest
                    ),
                    Direction::Sell => info!(
                        "trade::loop: Sell succeeded, sold {} ANAM01, digest {}",
                        intent.amount_in, result.digest
                    ),
                }
                CycleOutcome::Traded {
                    direction,
                    amount: intent.amount_in,
                    digest: result.digest,
                }
            }
            ExecutionStatus::Failure(reason) => {
                failed(format!("execution aborted in {}: {reason}", result.digest))
            }
        }
    }
}
