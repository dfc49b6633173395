//! # Wallet
//!
//! The single signing identity of the agent: credential parsing, mnemonic
//! derivation and the Ed25519 keypair.

/// Ordered credential parsers
pub mod credential;
/// Ed25519 keypair and Sui address
pub mod keypair;
/// BIP-39 / SLIP-0010 derivation
pub mod mnemonic;

pub use credential::{parse_credential, KeyFormat, ParsedCredential};
pub use keypair::Keypair;
