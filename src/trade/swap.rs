//! Buy and sell transactions against the pool.
//!
//! Both directions split the exact input amount off a single owned coin and
//! pass the split coin to the pool's swap function. The pool's generic
//! parameters are always `<ANAM01, VRAM>`.

use eyre::Result;

use super::types::{Direction, TradeIntent};
use crate::config::PoolConfig;
use crate::sui::{Address, ObjectId, TransactionBuilder, UnsignedTransaction};
use crate::utils::constants::{
    BUY_FUNCTION, GAS_BUDGET, MAX_AMOUNT_IN, SELL_FUNCTION, SWAP_MODULE,
};

/// Spends `amount_in` of the primary token from `coin_id` for the secondary
/// token, delivered to `recipient`.
///
/// Call: `buy(market, pool, coin, max_amount_in, min_amount_out, recipient)`.
///
/// # Errors
/// * If a pure argument or the call target cannot be encoded
pub fn build_buy(
    pool: &PoolConfig,
    amount_in: u64,
    min_amount_out: u64,
    recipient: Address,
    coin_id: ObjectId,
) -> Result<UnsignedTransaction> {
    let mut tx = TransactionBuilder::new();
    let coin = tx.object(coin_id, false);
    let amount = tx.pure(&amount_in)?;
    let payment = tx.split_coin(coin, amount);

    let market = tx.object(pool.market, true);
    let pool_object = tx.object(pool.pool, true);
    let max_amount_in = tx.pure(&MAX_AMOUNT_IN)?;
    let min_amount_out = tx.pure(&min_amount_out)?;
    let recipient = tx.pure(&recipient)?;

    tx.move_call(
        pool.package,
        SWAP_MODULE,
        BUY_FUNCTION,
        pool.type_arguments(),
        vec![
            market,
            pool_object,
            payment,
            max_amount_in,
            min_amount_out,
            recipient,
        ],
    )?;
    Ok(tx.finish(GAS_BUDGET))
}

/// Spends `amount_in` of the secondary token from `coin_id` for the primary
/// token. The pool pays the sender.
///
/// Call: `sell(market, pool, coin, min_amount_out)`.
///
/// # Errors
/// * If a pure argument or the call target cannot be encoded
pub fn build_sell(
    pool: &PoolConfig,
    amount_in: u64,
    min_amount_out: u64,
    coin_id: ObjectId,
) -> Result<UnsignedTransaction> {
    let mut tx = TransactionBuilder::new();
    let coin = tx.object(coin_id, false);
    let amount = tx.pure(&amount_in)?;
    let payment = tx.split_coin(coin, amount);

    let market = tx.object(pool.market, true);
    let pool_object = tx.object(pool.pool, true);
    let min_amount_out = tx.pure(&min_amount_out)?;

    tx.move_call(
        pool.package,
        SWAP_MODULE,
        SELL_FUNCTION,
        pool.type_arguments(),
        vec![market, pool_object, payment, min_amount_out],
    )?;
    Ok(tx.finish(GAS_BUDGET))
}

/// Builds the transaction for a decided trade.
///
/// # Errors
/// * If a pure argument cannot be encoded
pub fn build_from_intent(
    pool: &PoolConfig,
    intent: &TradeIntent,
    recipient: Address,
) -> Result<UnsignedTransaction> {
    match intent.direction {
        Direction::Buy => build_buy(
            pool,
            intent.amount_in,
            intent.min_amount_out,
            recipient,
            intent.coin_id,
        ),
        Direction::Sell => build_sell(pool, intent.amount_in, intent.min_amount_out, intent.coin_id),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sui::{Argument, Command, SplitCoins, TxInput};
    use crate::trade::test_helpers::*;

    #[test]
    fn test_buy_layout() {
        let pool = pool();
        let recipient = keypair().address();
        let tx = build_buy(&pool, 1_000, 0, recipient, coin_id(3)).unwrap();

        assert_eq!(tx.gas_budget, 10_000_000);
        assert_eq!(tx.object_ids(), vec![coin_id(3), pool.market, pool.pool]);
        assert_eq!(
            tx.commands[0],
            Command::SplitCoins(SplitCoins {
                coin: Argument::Input(0),
                amounts: vec![Argument::Input(1)],
            })
        );
        assert_eq!(tx.pure_u64(Argument::Input(1)), Some(1_000));

        let call = tx.move_call().unwrap();
        assert_eq!(call.package, pool.package);
        assert_eq!((call.module.as_str(), call.function.as_str()), ("vram", "buy"));
        assert_eq!(call.type_arguments, pool.type_arguments());
        assert_eq!(call.arguments.len(), 6);
        assert_eq!(call.arguments[2], Argument::NestedResult(0, 0));
        assert_eq!(tx.pure_u64(call.arguments[3]), Some(u64::MAX));
        assert_eq!(tx.pure_u64(call.arguments[4]), Some(0));

        let Argument::Input(index) = call.arguments[5] else {
            panic!("recipient must be an input");
        };
        assert_eq!(
            tx.inputs[usize::from(index)],
            TxInput::Pure(recipient.as_bytes().to_vec())
        );
    }

    #[test]
    fn test_shared_objects_are_mutable() {
        let pool = pool();
        let tx = build_sell(&pool, 5, 0, coin_id(0)).unwrap();
        let flags: Vec<(ObjectId, bool)> = tx
            .inputs
            .iter()
            .filter_map(|input| match input {
                TxInput::Object { id, mutable } => Some((*id, *mutable)),
                TxInput::Pure(_) => None,
            })
            .collect();
        assert_eq!(
            flags,
            vec![(coin_id(0), false), (pool.market, true), (pool.pool, true)]
        );
    }

    #[test]
    fn test_sell_layout() {
        let pool = pool();
        let tx = build_sell(&pool, 1, 0, coin_id(1)).unwrap();

        assert_eq!(tx.gas_budget, 10_000_000);
        assert_eq!(tx.pure_u64(Argument::Input(1)), Some(1));

        let call = tx.move_call().unwrap();
        assert_eq!((call.module.as_str(), call.function.as_str()), ("vram", "sell"));
        assert_eq!(call.type_arguments, pool.type_arguments());
        assert_eq!(call.arguments.len(), 4);
        assert_eq!(call.arguments[2], Argument::NestedResult(0, 0));
        assert_eq!(tx.pure_u64(call.arguments[3]), Some(0));
    }

    #[test]
    fn test_buy_entire_coin() {
        let pool = pool();
        let tx = build_buy(&pool, u64::MAX, 0, keypair().address(), coin_id(0)).unwrap();
        assert_eq!(tx.pure_u64(Argument::Input(1)), Some(u64::MAX));

        let call = tx.move_call().unwrap();
        assert_eq!(call.arguments[2], Argument::NestedResult(0, 0));
        assert_eq!(tx.pure_u64(call.arguments[3]), Some(u64::MAX));
    }

    #[test]
    fn test_from_intent() {
        let pool = pool();
        let recipient = keypair().address();
        let sell = TradeIntent {
            direction: Direction::Sell,
            amount_in: 42,
            min_amount_out: 0,
            coin_id: coin_id(2),
        };
        assert_eq!(
            build_from_intent(&pool, &sell, recipient).unwrap(),
            build_sell(&pool, 42, 0, coin_id(2)).unwrap()
        );

        let buy = TradeIntent {
            direction: Direction::Buy,
            ..sell
        };
        assert_eq!(
            build_from_intent(&pool, &buy, recipient).unwrap(),
            build_buy(&pool, 42, 0, recipient, coin_id(2)).unwrap()
        );
    }
}
