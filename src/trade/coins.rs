//! Balances and coin selection.
//!
//! Selection is first-fit in query order. There is no attempt to minimize
//! fragmentation or merge coins.

use eyre::Result;

use crate::sui::{Address, ChainClient, Coin, ObjectId};
use crate::utils::app_context::AppContext;
use crate::utils::constants::VRAM_DECIMALS;

/// Both balances of the controlled address at the start of a cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balances {
    /// Primary token (VRAM)
    pub primary: u64,
    /// Secondary token (ANAM01)
    pub secondary: u64,
}

/// Primary token amount in whole units with four decimals, rounded half up.
#[must_use]
pub fn format_primary(amount: u64) -> String {
    let step = u128::from(10u64.pow(VRAM_DECIMALS) / 10_000);
    let ticks = (u128::from(amount) + step / 2) / step;
    format!("{}.{:04}", ticks / 10_000, ticks % 10_000)
}

/// Sum of all coin balances, saturating.
#[must_use]
pub fn total_balance(coins: &[Coin]) -> u64 {
    coins
        .iter()
        .fold(0u64, |total, coin| total.saturating_add(coin.balance))
}

/// First coin holding at least `minimum`.
#[must_use]
pub fn first_fit(coins: &[Coin], minimum: u64) -> Option<&Coin> {
    coins.iter().find(|coin| coin.balance >= minimum)
}

/// Total balance of `coin_type` held by `owner`.
///
/// # Errors
/// * If the coin query fails
pub async fn fetch_balance<C: ChainClient>(
    client: &C,
    owner: &Address,
    coin_type: &str,
) -> Result<u64> {
    let coins = client.get_coins(owner, coin_type).await?;
    Ok(total_balance(&coins))
}

/// Id of the first coin of `coin_type` holding at least `minimum`.
///
/// `None` is an ordinary outcome meaning no single coin is large enough.
///
/// # Errors
/// * If the coin query fails
pub async fn find_coin<C: ChainClient>(
    client: &C,
    owner: &Address,
    coin_type: &str,
    minimum: u64,
) -> Result<Option<ObjectId>> {
    let coins = client.get_coins(owner, coin_type).await?;
    Ok(first_fit(&coins, minimum).map(|coin| coin.coin_object_id))
}

/// Queries both balances, primary first.
///
/// # Errors
/// * If either coin query fails
pub async fn fetch_balances<C: ChainClient>(ctx: &AppContext<C>) -> Result<Balances> {
    let primary = fetch_balance(&ctx.client, &ctx.address, &ctx.pool.primary_coin_type()).await?;
    let secondary =
        fetch_balance(&ctx.client, &ctx.address, &ctx.pool.secondary_coin_type()).await?;
    Ok(Balances { primary, secondary })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::trade::test_helpers::*;

    #[test]
    fn test_first_fit_takes_first_eligible() {
        let coins = coins(&[10, 50, 80, 50]);
        assert_eq!(first_fit(&coins, 50).unwrap().coin_object_id, coin_id(1));
        assert_eq!(first_fit(&coins, 11).unwrap().coin_object_id, coin_id(1));
        assert_eq!(first_fit(&coins, 80).unwrap().coin_object_id, coin_id(2));
        assert_eq!(first_fit(&coins, 0).unwrap().coin_object_id, coin_id(0));
    }

    #[test]
    fn test_first_fit_none() {
        assert!(first_fit(&coins(&[10, 20, 30]), 31).is_none());
        assert!(first_fit(&[], 1).is_none());
    }

    #[test]
    fn test_first_fit_only_returns_eligible() {
        let balances = [3, 1_000, 7, 999, 1_001, 0];
        let coins = coins(&balances);
        for minimum in [0, 1, 3, 4, 7, 8, 999, 1_000, 1_001, 1_002] {
            match first_fit(&coins, minimum) {
                Some(coin) => assert!(coin.balance >= minimum),
                None => assert!(balances.iter().all(|b| *b < minimum)),
            }
        }
    }

    #[test]
    fn test_format_primary() {
        assert_eq!(format_primary(0), "0.0000");
        assert_eq!(format_primary(1_000_000_000), "1.0000");
        assert_eq!(format_primary(12_345_678_900), "12.3457");
        assert_eq!(format_primary(12_345_649_999), "12.3456");
        assert_eq!(format_primary(99_999), "0.0001");
        assert_eq!(format_primary(50_000), "0.0001");
        assert_eq!(format_primary(49_999), "0.0000");
        assert_eq!(format_primary(100_000), "0.0001");
        assert_eq!(format_primary(999_950_000), "1.0000");
        assert_eq!(format_primary(u64::MAX), "18446744073.7096");
    }

    #[test]
    fn test_total_balance_saturates() {
        assert_eq!(total_balance(&coins(&[1, 2, 3])), 6);
        assert_eq!(total_balance(&coins(&[u64::MAX, 1])), u64::MAX);
        assert_eq!(total_balance(&[]), 0);
    }

    #[tokio::test]
    async fn test_find_coin_against_chain() {
        let pool = pool();
        let ctx = context(MockChain::new().with_coins(&pool.primary_coin_type(), &[5, 500]));

        let found = find_coin(&ctx.client, &ctx.address, &pool.primary_coin_type(), 100)
            .await
            .unwrap();
        assert_eq!(found, Some(coin_id(1)));

        let missing = find_coin(&ctx.client, &ctx.address, &pool.primary_coin_type(), 501)
            .await
            .unwrap();
        assert_eq!(missing, None);

        let other = find_coin(&ctx.client, &ctx.address, &pool.secondary_coin_type(), 1)
            .await
            .unwrap();
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn test_fetch_balances() {
        let pool = pool();
        let ctx = context(
            MockChain::new()
                .with_coins(&pool.primary_coin_type(), &[1_000, 2_000])
                .with_coins(&pool.secondary_coin_type(), &[7]),
        );
        let balances = fetch_balances(&ctx).await.unwrap();
        assert_eq!(balances, Balances { primary: 3_000, secondary: 7 });
    }

    #[tokio::test]
    async fn test_fetch_balances_propagates_query_errors() {
        let ctx = context(MockChain::new().failing_queries());
        assert!(fetch_balances(&ctx).await.is_err());
    }
}
