//! Fixed on-chain identifiers and trading constants.

/// Sui testnet full node
pub const SUI_TESTNET_RPC: &str = "https://fullnode.testnet.sui.io:443";

/// Package holding the `vram` swap module
pub const PACKAGE_ID: &str = "0x5f422eac8ed9d1c87b3d033915fdfde4355e945db190e85e07a480cf662bb13f";
/// VRAM, the primary token the agent spends on buys
pub const VRAM_TOKEN_TYPE: &str =
    "0x785082b640fb4de6fa0804c3fbf80297c49c875d825db7cd56cd65b03902b48a::tram_token::TRAM_TOKEN";
/// ANAM01, the secondary token bought and sold against VRAM
pub const ANAM01_TOKEN_TYPE: &str =
    "0xe305c6628e23cd927c6b4b7b9213a2b20d99e431944742a0ee0d4dd3efcb46f6::anam01::ANAM01";
/// Shared market object
pub const MARKET_OBJECT: &str = "0x2262aef57f12b7ec3107ba06de44a7bf73f692803cc976052469b44c02c0c09b";
/// Shared AMM pool object
pub const POOL_OBJECT: &str = "0xe1a66da5266dda9ac35e1877b728bc2056beb6c9172e2a85fd031eba1789f2c2";

/// Gas coin type
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Swap module name
pub const SWAP_MODULE: &str = "vram";
/// Buy entry point: VRAM in, ANAM01 out
pub const BUY_FUNCTION: &str = "buy";
/// Sell entry point: ANAM01 in, VRAM out
pub const SELL_FUNCTION: &str = "sell";

/// Max-in ceiling passed to `buy`. The split coin already caps the input.
pub const MAX_AMOUNT_IN: u64 = u64::MAX;
/// Gas budget of every swap transaction, in MIST
pub const GAS_BUDGET: u64 = 10_000_000;
/// Minimum output of every swap; no slippage protection
pub const MIN_AMOUNT_OUT: u64 = 0;

/// Trading stops once VRAM drops below this many base units (1 VRAM)
pub const MIN_PRIMARY_BALANCE: u64 = 1_000_000_000;
/// VRAM decimals, used for display only
pub const VRAM_DECIMALS: u32 = 9;
