#![allow(clippy::unwrap_used, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{eyre, Result};

use super::entropy::Entropy;
use crate::config::{PoolConfig, TradingPolicy};
use crate::sui::{
    Address, ChainClient, Coin, Digest, ExecutionResult, ExecutionStatus, ObjectId,
    UnsignedTransaction,
};
use crate::utils::app_context::AppContext;
use crate::wallet::{KeyFormat, Keypair, ParsedCredential};

/// How the mock answers a submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Execution {
    Succeed,
    Abort(String),
    Reject(String),
}

/// In-memory chain: fixed coins per type, records every submission.
#[derive(Debug)]
pub struct MockChain {
    coins: HashMap<String, Vec<Coin>>,
    failing_queries: bool,
    execution: Execution,
    submitted: Mutex<Vec<UnsignedTransaction>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            coins: HashMap::new(),
            failing_queries: false,
            execution: Execution::Succeed,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_coins(mut self, coin_type: &str, balances: &[u64]) -> Self {
        self.coins.insert(coin_type.to_string(), coins(balances));
        self
    }

    pub fn failing_queries(mut self) -> Self {
        self.failing_queries = true;
        self
    }

    pub fn executing(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn submitted(&self) -> Vec<UnsignedTransaction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_coins(&self, _owner: &Address, coin_type: &str) -> Result<Vec<Coin>> {
        if self.failing_queries {
            return Err(eyre!("connection refused"));
        }
        Ok(self.coins.get(coin_type).cloned().unwrap_or_default())
    }

    async fn sign_and_execute(
        &self,
        _keypair: &Keypair,
        tx: UnsignedTransaction,
    ) -> Result<ExecutionResult> {
        self.submitted.lock().unwrap().push(tx);
        match &self.execution {
            Execution::Succeed => Ok(ExecutionResult {
                digest: "digest".to_string(),
                status: ExecutionStatus::Success,
            }),
            Execution::Abort(reason) => Ok(ExecutionResult {
                digest: "digest".to_string(),
                status: ExecutionStatus::Failure(reason.clone()),
            }),
            Execution::Reject(reason) => Err(eyre!("{reason}")),
        }
    }
}

/// Entropy replaying fixed answers; falls back to `low` and buy.
#[derive(Debug, Default)]
pub struct ScriptedEntropy {
    picks: VecDeque<u64>,
    flips: VecDeque<bool>,
}

impl ScriptedEntropy {
    pub fn picks(picks: &[u64]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
            flips: VecDeque::new(),
        }
    }

    pub fn flips(mut self, flips: &[bool]) -> Self {
        self.flips = flips.iter().copied().collect();
        self
    }
}

impl Entropy for ScriptedEntropy {
    fn pick_inclusive(&mut self, low: u64, high: u64) -> u64 {
        let pick = self.picks.pop_front().unwrap_or(low);
        assert!(
            (low..=high).contains(&pick),
            "scripted pick {pick} outside {low}..={high}"
        );
        pick
    }

    fn coin_flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(true)
    }
}

pub fn coin_id(index: u8) -> ObjectId {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xc0;
    bytes[31] = index;
    ObjectId::from(bytes)
}

pub fn coins(balances: &[u64]) -> Vec<Coin> {
    balances
        .iter()
        .enumerate()
        .map(|(index, balance)| Coin {
            coin_object_id: coin_id(u8::try_from(index).unwrap()),
            version: 1,
            digest: Digest::new([7; 32]),
            balance: *balance,
        })
        .collect()
}

pub fn pool() -> PoolConfig {
    PoolConfig::from_constants().unwrap()
}

pub fn keypair() -> Keypair {
    Keypair::from_secret(&[1; 32])
}

pub fn context(chain: MockChain) -> AppContext<MockChain> {
    AppContext::with_client(
        chain,
        ParsedCredential {
            format: KeyFormat::Hex,
            keypair: keypair(),
        },
        pool(),
        TradingPolicy::default(),
    )
}
