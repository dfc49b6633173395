//! # Sui chain access
//!
//! The agent talks to the chain through [`ChainClient`]: a coin query and a
//! sign-and-submit call. [`rpc::SuiRpcClient`] implements it over JSON-RPC;
//! tests substitute a mock.
//!
//! Wire types come from `sui_sdk_types`; this module only adds the pieces the
//! agent needs on top of them.

use async_trait::async_trait;
use eyre::{eyre, Result};

use crate::wallet::Keypair;

/// JSON-RPC client
pub mod rpc;
/// Unsigned transactions and their builder
pub mod transaction;

pub use rpc::SuiRpcClient;
pub use sui_sdk_types::{
    Address, Argument, Command, Digest, GasPayment, Identifier, Input, MoveCall,
    ObjectReference, ProgrammableTransaction, SplitCoins, StructTag, Transaction,
    TransactionExpiration, TransactionKind, TypeTag,
};
pub use transaction::{ResolvedObject, TransactionBuilder, TxInput, UnsignedTransaction};

/// Object ids share the address representation
pub type ObjectId = Address;

/// BCS bytes of a transaction, the payload that gets signed and submitted.
///
/// # Errors
/// * If BCS serialization fails
pub fn transaction_bytes(transaction: &Transaction) -> Result<Vec<u8>> {
    bcs::to_bytes(transaction).map_err(|e| eyre!("Failed to encode transaction: {e}"))
}

/// One coin object owned by an address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coin {
    /// Object id
    pub coin_object_id: ObjectId,
    /// Current version
    pub version: u64,
    /// Current digest
    pub digest: Digest,
    /// Amount held, in base units
    pub balance: u64,
}

impl Coin {
    /// Reference usable as an owned-object input or gas payment
    #[must_use]
    pub fn object_ref(&self) -> ObjectReference {
        ObjectReference::new(self.coin_object_id, self.version, self.digest)
    }
}

/// Outcome reported in the transaction effects
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Executed and committed
    Success,
    /// Committed with an abort; gas was still charged
    Failure(String),
}

/// Response to a submitted transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Transaction digest
    pub digest: String,
    /// Effects status
    pub status: ExecutionStatus,
}

/// The chain operations the agent depends on
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// All coins of `coin_type` owned by `owner`, in the order the node
    /// returns them.
    ///
    /// # Errors
    /// * If the query fails
    async fn get_coins(&self, owner: &Address, coin_type: &str) -> Result<Vec<Coin>>;

    /// Signs `tx` with `keypair` and submits it, asking for effects.
    ///
    /// # Errors
    /// * If the transaction cannot be completed, signed or submitted
    async fn sign_and_execute(
        &self,
        keypair: &Keypair,
        tx: UnsignedTransaction,
    ) -> Result<ExecutionResult>;
}
