//! Configuration for the agent.
//!
//! Everything except the credential and the endpoint is fixed: the pool, its
//! tokens and the trading policy are constants of this deployment.

use std::env;
use std::fmt;

use eyre::{eyre, Error, Result, WrapErr};
use url::Url;

use crate::sui::{ObjectId, StructTag, TypeTag};
use crate::utils::constants::{
    ANAM01_TOKEN_TYPE, MARKET_OBJECT, MIN_PRIMARY_BALANCE, PACKAGE_ID, POOL_OBJECT,
    SUI_TESTNET_RPC, VRAM_TOKEN_TYPE,
};

/// Environment variable holding the key or mnemonic
pub const CREDENTIALS_ENV: &str = "CREDENTIALS";
/// Optional override of the full node endpoint
pub const RPC_URL_ENV: &str = "SUI_RPC_URL";

/// The AMM pool and the two tokens it trades
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Package holding the swap module
    pub package: ObjectId,
    /// Shared market object
    pub market: ObjectId,
    /// Shared pool object
    pub pool: ObjectId,
    /// Token spent on buys (VRAM)
    pub primary: StructTag,
    /// Token bought and sold (ANAM01)
    pub secondary: StructTag,
}

impl PoolConfig {
    /// The deployment this agent was written for.
    ///
    /// # Errors
    /// * If one of the constants does not parse
    pub fn from_constants() -> Result<Self> {
        Ok(Self {
            package: PACKAGE_ID.parse()?,
            market: MARKET_OBJECT.parse()?,
            pool: POOL_OBJECT.parse()?,
            primary: VRAM_TOKEN_TYPE.parse()?,
            secondary: ANAM01_TOKEN_TYPE.parse()?,
        })
    }

    /// Coin type string of the primary token
    #[must_use]
    pub fn primary_coin_type(&self) -> String {
        self.primary.to_string()
    }

    /// Coin type string of the secondary token
    #[must_use]
    pub fn secondary_coin_type(&self) -> String {
        self.secondary.to_string()
    }

    /// Generic instantiation of the swap functions: `<ANAM01, VRAM>`
    #[must_use]
    pub fn type_arguments(&self) -> Vec<TypeTag> {
        vec![
            TypeTag::Struct(Box::new(self.secondary.clone())),
            TypeTag::Struct(Box::new(self.primary.clone())),
        ]
    }
}

/// Knobs of the trading loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradingPolicy {
    /// Stop once the primary balance is below this
    pub min_primary_balance: u64,
    /// Smallest share of a balance traded, in percent
    pub min_percent: u64,
    /// Largest share of a balance traded, in percent
    pub max_percent: u64,
    /// Shortest pause between cycles
    pub min_delay_ms: u64,
    /// Longest pause between cycles
    pub max_delay_ms: u64,
}

impl Default for TradingPolicy {
    fn default() -> Self {
        Self {
            min_primary_balance: MIN_PRIMARY_BALANCE,
            min_percent: 5,
            max_percent: 12,
            min_delay_ms: 5_000,
            max_delay_ms: 7_999,
        }
    }
}

/// Runtime configuration
#[derive(Clone)]
pub struct Config {
    /// Full node endpoint
    pub rpc_url: Url,
    /// Raw credential; never logged
    credentials: String,
    /// Pool being traded
    pub pool: PoolConfig,
    /// Loop policy
    pub policy: TradingPolicy,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Environment Variables
    /// * `CREDENTIALS` - private key or mnemonic (required)
    /// * `SUI_RPC_URL` - full node endpoint (defaults to testnet)
    ///
    /// # Errors
    /// * If `CREDENTIALS` is missing or empty
    /// * If `SUI_RPC_URL` is not a valid URL
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    /// * If `CREDENTIALS` is missing or empty
    /// * If `SUI_RPC_URL` is not a valid URL
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let credentials = lookup(CREDENTIALS_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| eyre!("{CREDENTIALS_ENV} must be set"))?;

        let rpc_url = lookup(RPC_URL_ENV).unwrap_or_else(|| SUI_TESTNET_RPC.to_string());
        let rpc_url =
            Url::parse(&rpc_url).wrap_err_with(|| format!("Invalid {RPC_URL_ENV}: {rpc_url}"))?;

        Ok(Self {
            rpc_url,
            credentials,
            pool: PoolConfig::from_constants()?,
            policy: TradingPolicy::default(),
        })
    }

    /// The raw credential string
    #[must_use]
    pub fn credentials(&self) -> &str {
        &self.credentials
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("credentials", &"[REDACTED]")
            .field("pool", &self.pool)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_credentials() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "CREDENTIALS must be set");

        let err = Config::from_lookup(lookup(&[("CREDENTIALS", "   ")])).unwrap_err();
        assert_eq!(err.to_string(), "CREDENTIALS must be set");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("CREDENTIALS", "secret")])).unwrap();
        assert_eq!(config.rpc_url.as_str(), "https://fullnode.testnet.sui.io/");
        assert_eq!(config.credentials(), "secret");
        assert_eq!(config.policy.min_primary_balance, 1_000_000_000);
        assert_eq!((config.policy.min_percent, config.policy.max_percent), (5, 12));
        assert_eq!((config.policy.min_delay_ms, config.policy.max_delay_ms), (5_000, 7_999));
    }

    #[test]
    fn test_rpc_override() {
        let config = Config::from_lookup(lookup(&[
            ("CREDENTIALS", "secret"),
            ("SUI_RPC_URL", "http://127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:9000/");

        assert!(Config::from_lookup(lookup(&[
            ("CREDENTIALS", "secret"),
            ("SUI_RPC_URL", "not a url"),
        ]))
        .is_err());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = Config::from_lookup(lookup(&[("CREDENTIALS", "hunter2")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_pool_type_arguments_order() {
        let pool = PoolConfig::from_constants().unwrap();
        let args: Vec<String> = pool.type_arguments().iter().map(ToString::to_string).collect();
        assert_eq!(args, vec![pool.secondary_coin_type(), pool.primary_coin_type()]);
        assert!(args[0].ends_with("::anam01::ANAM01"));
        assert!(args[1].ends_with("::tram_token::TRAM_TOKEN"));
    }
}
