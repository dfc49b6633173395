//! BIP-39 mnemonic to Ed25519 secret, following SLIP-0010.
//!
//! Ed25519 only supports hardened derivation, so every path segment is
//! hardened regardless of how it is written.

use bip39::Mnemonic;
use eyre::{eyre, Result};
use hmac::{Hmac, Mac};
use sha2::Sha512;

/// HMAC key for the SLIP-0010 master node
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Hardened offset
const HARDENED: u32 = 0x8000_0000;

/// `m/44'/784'/0'/0'/0'`, the default Sui Ed25519 account
pub const SUI_DERIVATION_PATH: [u32; 5] = [44, 784, 0, 0, 0];

/// HMAC-SHA512
type HmacSha512 = Hmac<Sha512>;

/// A SLIP-0010 node: secret key and chain code
struct Node {
    /// Secret key
    key: [u8; 32],
    /// Chain code
    chain_code: [u8; 32],
}

impl Node {
    /// Splits an HMAC output into key (left) and chain code (right)
    fn from_hmac(key: &[u8], data: &[&[u8]]) -> Result<Self> {
        let mut mac =
            HmacSha512::new_from_slice(key).map_err(|e| eyre!("Invalid HMAC key: {e}"))?;
        for part in data {
            mac.update(part);
        }
        let output = mac.finalize().into_bytes();

        let mut node = Self {
            key: [0; 32],
            chain_code: [0; 32],
        };
        node.key.copy_from_slice(&output[..32]);
        node.chain_code.copy_from_slice(&output[32..]);
        Ok(node)
    }

    /// Hardened child at `index`
    fn child(&self, index: u32) -> Result<Self> {
        let index = (index | HARDENED).to_be_bytes();
        Self::from_hmac(&self.chain_code, &[&[0], &self.key, &index])
    }
}

/// Derives the secret key at `path` from a BIP-39 seed.
///
/// # Errors
/// * If HMAC initialization fails
pub fn derive_path(seed: &[u8], path: &[u32]) -> Result<[u8; 32]> {
    let mut node = Node::from_hmac(ED25519_SEED_KEY, &[seed])?;
    for index in path {
        node = node.child(*index)?;
    }
    Ok(node.key)
}

/// Derives the default Sui account secret from a mnemonic phrase.
///
/// Words are lowercased and whitespace is collapsed before validation. The
/// seed uses an empty passphrase.
///
/// # Errors
/// * If the phrase is not a valid BIP-39 mnemonic
pub fn secret_from_mnemonic(phrase: &str) -> Result<[u8; 32]> {
    let normalized = phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    let mnemonic =
        Mnemonic::parse_normalized(&normalized).map_err(|e| eyre!("Invalid mnemonic: {e}"))?;
    derive_path(&mnemonic.to_seed_normalized(""), &SUI_DERIVATION_PATH)
}
