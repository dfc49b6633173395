/*!
 * # vram-trader - Automated swaps on a Sui AMM pool
 *
 * A long-running agent that trades VRAM against ANAM01 on a fixed Sui pool.
 * Every cycle it reads both balances, flips a coin between buy and sell,
 * trades a random 5-12% of the input balance and waits a few seconds. It
 * stops once the VRAM balance drops below one whole token.
 *
 * ## Module Structure
 *
 * - `config`: Environment configuration, pool identifiers and trading policy
 * - `sui`: Transaction building on `sui-sdk-types` and the JSON-RPC chain client
 * - `trade`: Amount and coin selection, swap builders and the trading loop
 * - `utils`: Session context, constants and logging
 * - `wallet`: Credential parsing and the Ed25519 keypair
 */

/// Configuration management for the agent
pub mod config;
/// Sui transaction types and chain access
pub mod sui;
/// Trade selection, construction and the trading loop
pub mod trade;
/// Utility functions and helpers
pub mod utils;
/// Signing identity
pub mod wallet;
