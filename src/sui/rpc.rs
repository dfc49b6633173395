use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use eyre::{bail, eyre, Result, WrapErr};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{
    transaction_bytes, Address, ChainClient, Coin, Digest, ExecutionResult, ExecutionStatus,
    GasPayment, ObjectId, ObjectReference, ResolvedObject, Transaction, TransactionExpiration,
    TransactionKind, UnsignedTransaction,
};
use crate::utils::constants::SUI_COIN_TYPE;
use crate::wallet::Keypair;

/// Page size for `suix_getCoins`
const COIN_PAGE_LIMIT: u32 = 50;

/// JSON-RPC client for a Sui full node.
///
/// Requests carry no timeout: a stalled node stalls the caller.
#[derive(Debug)]
pub struct SuiRpcClient {
    /// HTTP client
    http: Client,
    /// Full node endpoint
    url: Url,
    /// Next JSON-RPC request id
    request_id: AtomicU64,
}

/// JSON-RPC envelope
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    /// Present on success
    result: Option<T>,
    /// Present on failure
    error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct RpcError {
    /// Error code
    code: i64,
    /// Error message
    message: String,
}

/// One page of `suix_getCoins`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinPage {
    /// Coins on this page
    data: Vec<RpcCoin>,
    /// Cursor for the next page
    next_cursor: Option<String>,
    /// Whether another page exists
    has_next_page: bool,
}

/// Coin as returned by the node; numbers arrive as strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcCoin {
    /// Object id
    coin_object_id: String,
    /// Version
    version: String,
    /// Base58 digest
    digest: String,
    /// Balance
    balance: String,
}

impl TryFrom<RpcCoin> for Coin {
    type Error = eyre::Error;

    fn try_from(coin: RpcCoin) -> Result<Self> {
        Ok(Self {
            coin_object_id: coin.coin_object_id.parse()?,
            version: coin.version.parse().wrap_err("Invalid coin version")?,
            digest: Digest::from_base58(&coin.digest)?,
            balance: coin.balance.parse().wrap_err("Invalid coin balance")?,
        })
    }
}

/// Entry of `sui_multiGetObjects`
#[derive(Debug, Deserialize)]
struct ObjectResponse {
    /// Object data when found
    data: Option<ObjectData>,
    /// Error when not found or deleted
    error: Option<Value>,
}

/// Object data requested with `showOwner`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectData {
    /// Object id
    object_id: String,
    /// Version
    version: String,
    /// Base58 digest
    digest: String,
    /// Owner, e.g. `{"AddressOwner": ..}` or `{"Shared": {..}}`
    owner: Option<Value>,
}

impl TryFrom<ObjectData> for ResolvedObject {
    type Error = eyre::Error;

    fn try_from(data: ObjectData) -> Result<Self> {
        let initial_shared_version = data.owner.as_ref().and_then(initial_shared_version);
        Ok(Self {
            reference: ObjectReference::new(
                data.object_id.parse()?,
                data.version.parse().wrap_err("Invalid object version")?,
                Digest::from_base58(&data.digest)?,
            ),
            initial_shared_version,
        })
    }
}

/// Reads `Shared.initial_shared_version`, which nodes emit as a number or a string
fn initial_shared_version(owner: &Value) -> Option<u64> {
    let version = owner.get("Shared")?.get("initial_shared_version")?;
    version
        .as_u64()
        .or_else(|| version.as_str().and_then(|s| s.parse().ok()))
}

/// Response of `sui_executeTransactionBlock`
#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    /// Transaction digest
    digest: String,
    /// Effects, requested with `showEffects`
    effects: Option<Effects>,
}

/// Effects subset
#[derive(Debug, Deserialize)]
struct Effects {
    /// Execution status
    status: EffectsStatus,
}

/// `{"status": "success"}` or `{"status": "failure", "error": ".."}`
#[derive(Debug, Deserialize)]
struct EffectsStatus {
    /// `success` or `failure`
    status: String,
    /// Abort description on failure
    error: Option<String>,
}

impl From<ExecuteResponse> for ExecutionResult {
    fn from(response: ExecuteResponse) -> Self {
        let status = match response.effects {
            Some(effects) if effects.status.status == "success" => ExecutionStatus::Success,
            Some(effects) => ExecutionStatus::Failure(
                effects.status.error.unwrap_or(effects.status.status),
            ),
            None => ExecutionStatus::Failure("effects missing from response".to_string()),
        };
        Self {
            digest: response.digest,
            status,
        }
    }
}

/// Parses a u64 that may be encoded as a JSON number or string
fn json_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

impl SuiRpcClient {
    /// Creates a client bound to a full node endpoint.
    ///
    /// # Errors
    /// * If the HTTP client cannot be built
    pub fn new(url: Url) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            url,
            request_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this client talks to
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Performs one JSON-RPC call.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        log::debug!("sui::rpc: -> {method} #{id}");
        let response = self
            .http
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .wrap_err_with(|| format!("{method} request failed"))?
            .error_for_status()?
            .json::<RpcResponse<T>>()
            .await
            .wrap_err_with(|| format!("{method} returned an unexpected body"))?;

        match response {
            RpcResponse {
                result: Some(result),
                ..
            } => Ok(result),
            RpcResponse {
                error: Some(error), ..
            } => Err(eyre!(
                "{method} failed: {} (code {})",
                error.message,
                error.code
            )),
            _ => Err(eyre!("{method} returned neither result nor error")),
        }
    }

    /// Fetches owner and version data for every object input.
    async fn resolve_objects(
        &self,
        ids: &[ObjectId],
    ) -> Result<HashMap<ObjectId, ResolvedObject>> {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let responses: Vec<ObjectResponse> = self
            .call("sui_multiGetObjects", json!([ids, { "showOwner": true }]))
            .await?;

        let mut objects = HashMap::with_capacity(responses.len());
        for (id, response) in ids.iter().zip(responses) {
            let Some(data) = response.data else {
                bail!(
                    "Object {id} is unavailable: {}",
                    response.error.unwrap_or(Value::Null)
                );
            };
            let object = ResolvedObject::try_from(data)?;
            objects.insert(*object.reference.object_id(), object);
        }
        Ok(objects)
    }

    /// Current reference gas price
    async fn reference_gas_price(&self) -> Result<u64> {
        let price: Value = self.call("suix_getReferenceGasPrice", json!([])).await?;
        json_u64(&price).ok_or_else(|| eyre!("Invalid reference gas price: {price}"))
    }

    /// First SUI coin able to cover `budget` on its own
    async fn gas_coin(&self, owner: &Address, budget: u64) -> Result<Coin> {
        self.get_coins(owner, SUI_COIN_TYPE)
            .await?
            .into_iter()
            .find(|coin| coin.balance >= budget)
            .ok_or_else(|| eyre!("No SUI coin of {owner} covers the gas budget of {budget}"))
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn get_coins(&self, owner: &Address, coin_type: &str) -> Result<Vec<Coin>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page: CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner.to_string(), coin_type, cursor, COIN_PAGE_LIMIT]),
                )
                .await?;

            for coin in page.data {
                coins.push(Coin::try_from(coin)?);
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        log::debug!(
            "sui::rpc: {} coins of {coin_type} owned by {owner}",
            coins.len()
        );
        Ok(coins)
    }

    async fn sign_and_execute(
        &self,
        keypair: &Keypair,
        tx: UnsignedTransaction,
    ) -> Result<ExecutionResult> {
        let sender = keypair.address();
        let objects = self.resolve_objects(&tx.object_ids()).await?;
        let price = self.reference_gas_price().await?;
        let gas_coin = self.gas_coin(&sender, tx.gas_budget).await?;

        let transaction = Transaction {
            kind: TransactionKind::ProgrammableTransaction(tx.resolve(&objects)?),
            sender,
            gas_payment: GasPayment {
                objects: vec![gas_coin.object_ref()],
                owner: sender,
                price,
                budget: tx.gas_budget,
            },
            expiration: TransactionExpiration::None,
        };

        let tx_bytes = transaction_bytes(&transaction)?;
        let signature = keypair.sign_transaction(&transaction).to_base64();

        let response: ExecuteResponse = self
            .call(
                "sui_executeTransactionBlock",
                json!([
                    STANDARD.encode(&tx_bytes),
                    [signature],
                    { "showEffects": true },
                    "WaitForLocalExecution"
                ]),
            )
            .await?;

        Ok(response.into())
    }
}
