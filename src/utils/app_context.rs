//! Session context shared by every component of the agent.
//!
//! Built once at startup and passed by reference: the chain client, the
//! signing identity and the fixed pool/policy configuration.

use eyre::{Error, Result, WrapErr};

use crate::config::{Config, PoolConfig, TradingPolicy};
use crate::sui::{Address, ChainClient, SuiRpcClient};
use crate::wallet::{parse_credential, KeyFormat, Keypair, ParsedCredential};

/// Application context for one controlled address.
#[derive(Debug)]
pub struct AppContext<C = SuiRpcClient> {
    /// Chain access
    pub client: C,
    /// Signing keypair
    pub keypair: Keypair,
    /// Address derived from the keypair
    pub address: Address,
    /// Format the credential was recognized as
    pub key_format: KeyFormat,
    /// Pool being traded
    pub pool: PoolConfig,
    /// Loop policy
    pub policy: TradingPolicy,
}

impl AppContext<SuiRpcClient> {
    /// Creates the context against the configured full node.
    ///
    /// # Returns
    /// * `Result<Self, Error>` - The initialized context or an error
    ///
    /// # Errors
    /// * If the credential matches none of the supported formats
    /// * If the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self, Error> {
        let credential =
            parse_credential(config.credentials()).wrap_err("Failed to load credentials")?;
        let client = SuiRpcClient::new(config.rpc_url.clone())?;
        Ok(Self::with_client(
            client,
            credential,
            config.pool.clone(),
            config.policy,
        ))
    }
}

impl<C: ChainClient> AppContext<C> {
    /// Creates the context around an existing chain client.
    #[must_use]
    pub fn with_client(
        client: C,
        credential: ParsedCredential,
        pool: PoolConfig,
        policy: TradingPolicy,
    ) -> Self {
        let ParsedCredential { format, keypair } = credential;
        Self {
            address: keypair.address(),
            client,
            keypair,
            key_format: format,
            pool,
            policy,
        }
    }
}
