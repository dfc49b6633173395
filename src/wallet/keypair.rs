//! Ed25519 signing identity.
//!
//! The secret key never leaves this type: it is not serialized, logged, or
//! exposed through `Debug`.

use std::fmt;

use ed25519_dalek::{Signer as _, SigningKey};
use sui_sdk_types::{
    Address, Ed25519PublicKey, Ed25519Signature, SimpleSignature, Transaction, UserSignature,
};

/// Signature scheme flag for Ed25519
pub const ED25519_FLAG: u8 = 0x00;

/// Ed25519 keypair for the controlled address
#[derive(Clone)]
pub struct Keypair {
    /// Secret key
    signing_key: SigningKey,
}

impl Keypair {
    /// Builds the keypair from 32 secret bytes.
    #[must_use]
    pub fn from_secret(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Public half of the keypair
    #[must_use]
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Sui address: blake2b256 of the scheme flag followed by the public key.
    #[must_use]
    pub fn address(&self) -> Address {
        self.public_key().derive_address()
    }

    /// Signs a 32 byte intent digest.
    #[must_use]
    pub fn sign_digest(&self, digest: &[u8; 32]) -> UserSignature {
        let signature = self.signing_key.sign(digest);
        UserSignature::Simple(SimpleSignature::Ed25519 {
            signature: Ed25519Signature::new(signature.to_bytes()),
            public_key: self.public_key(),
        })
    }

    /// Signs `transaction` under the transaction intent.
    ///
    /// # Returns
    /// The user signature; `to_base64()` gives the `flag || signature || public key`
    /// form the RPC expects.
    #[must_use]
    pub fn sign_transaction(&self, transaction: &Transaction) -> UserSignature {
        self.sign_digest(&transaction.signing_digest())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
