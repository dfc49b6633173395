//! Randomized trade sizing.

use super::entropy::Entropy;

/// `floor(balance * percent / 100)`, computed without overflow.
#[must_use]
pub fn percentage_of(balance: u64, percent: u64) -> u64 {
    let amount = u128::from(balance) * u128::from(percent) / 100;
    u64::try_from(amount).unwrap_or(u64::MAX)
}

/// Picks a random share of `balance` between `min_percent` and
/// `max_percent` inclusive.
///
/// A zero result is possible for small balances. Callers decide whether that
/// means skipping the trade or trading a single unit.
pub fn choose_amount(
    balance: u64,
    min_percent: u64,
    max_percent: u64,
    entropy: &mut impl Entropy,
) -> u64 {
    let percent = entropy.pick_inclusive(min_percent, max_percent);
    percentage_of(balance, percent)
}
