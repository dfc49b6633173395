use derive_more::Display;

use crate::sui::ObjectId;

/// Side of a trade against the pool.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Spend the primary token (VRAM) for the secondary token (ANAM01)
    #[display("buy")]
    Buy,
    /// Spend the secondary token for the primary token
    #[display("sell")]
    Sell,
}

/// The decision taken in one cycle, discarded after submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeIntent {
    /// Buy or sell
    pub direction: Direction,
    /// Amount of the input token, in base units
    pub amount_in: u64,
    /// Minimum accepted output; always zero, there is no slippage guard
    pub min_amount_out: u64,
    /// Coin the input amount is split from
    pub coin_id: ObjectId,
}
