//! Source of randomness for the trading loop.
//!
//! Every random decision goes through [`Entropy`] so tests can script the
//! exact sequence of draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random decisions the loop makes
pub trait Entropy {
    /// Uniform integer in `[low, high]`. Returns `low` when `high < low`.
    fn pick_inclusive(&mut self, low: u64, high: u64) -> u64;

    /// Fair coin; `true` means buy.
    fn coin_flip(&mut self) -> bool;
}

/// OS-seeded generator used in production
#[derive(Debug)]
pub struct OsEntropy {
    /// Underlying generator
    rng: StdRng,
}

impl OsEntropy {
    /// Seeds a new generator from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl Entropy for OsEntropy {
    fn pick_inclusive(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}
