//! In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use claims_agent::chain::{ChainReader, DelegationState, TokenBalances};
use claims_agent::claims::{CallOutcome, ClaimKey, ClaimRecord, ClaimSource, ClaimStatusReader};
use claims_agent::{AgentError, Result};
use ethers::types::{Address, H256, U256};
use num_bigint::BigUint;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";

pub fn address(s: &str) -> Address {
    s.parse().unwrap()
}

pub fn record(tranche_id: &str, index: u64, claim_type: u32, claimant: Address, amount: &str) -> ClaimRecord {
    ClaimRecord {
        tranche_id: tranche_id.to_string(),
        index,
        claim_type,
        claimant,
        claimable_amount: amount.parse::<BigUint>().unwrap(),
        proof: vec![H256::repeat_byte(index as u8)],
    }
}

/// Fixed claim list; counts upstream fetches.
pub struct StaticSource {
    claims: Arc<Vec<ClaimRecord>>,
    pub fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(claims: Vec<ClaimRecord>) -> Self {
        Self {
            claims: Arc::new(claims),
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ClaimSource for StaticSource {
    async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.claims.clone())
    }
}

pub struct UnavailableSource;

#[async_trait]
impl ClaimSource for UnavailableSource {
    async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>> {
        Err(AgentError::source_unavailable("claim document returned 503"))
    }
}

/// Claimed status from fixed key sets; records every batch it is asked for.
#[derive(Default)]
pub struct KeyedStatuses {
    pub claimed: HashSet<ClaimKey>,
    pub failing: HashSet<ClaimKey>,
    pub down: bool,
    pub batches: Mutex<Vec<Vec<ClaimKey>>>,
}

impl KeyedStatuses {
    pub fn claimed(keys: impl IntoIterator<Item = (&'static str, u64)>) -> Self {
        Self {
            claimed: keys.into_iter().map(key).collect(),
            ..Default::default()
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

pub fn key(pair: (&str, u64)) -> ClaimKey {
    ClaimKey {
        tranche_id: pair.0.to_string(),
        index: pair.1,
    }
}

#[async_trait]
impl ClaimStatusReader for KeyedStatuses {
    async fn claim_statuses(&self, chain_id: u64, keys: &[ClaimKey]) -> Result<Vec<CallOutcome<bool>>> {
        self.batches.lock().unwrap().push(keys.to_vec());
        if self.down {
            return Err(AgentError::chain_unavailable(chain_id, "rpc unreachable"));
        }
        Ok(keys
            .iter()
            .map(|k| {
                if self.failing.contains(k) {
                    CallOutcome::Failed("execution reverted".to_string())
                } else {
                    CallOutcome::Success(self.claimed.contains(k))
                }
            })
            .collect())
    }
}

/// Canned chain reads for the route tests
pub struct FakeChain {
    pub balances: TokenBalances,
    pub delegation: DelegationState,
    pub pool_balance: U256,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            balances: TokenBalances {
                balance_of: CallOutcome::Success(U256::from(5_000u64)),
                swappable_balance_of: CallOutcome::Success(U256::from(1_250u64)),
            },
            delegation: DelegationState {
                balance: U256::exp10(18) * 10,
                is_listed_agent: true,
            },
            pool_balance: U256::zero(),
        }
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn token_balances(&self, _chain_id: u64, _account: Address) -> Result<TokenBalances> {
        Ok(self.balances.clone())
    }

    async fn delegation_state(
        &self,
        _chain_id: u64,
        _account: Address,
        _agent: Address,
    ) -> Result<DelegationState> {
        Ok(self.delegation)
    }

    async fn staking_pool_balance(&self, _chain_id: u64) -> Result<U256> {
        Ok(self.pool_balance)
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
