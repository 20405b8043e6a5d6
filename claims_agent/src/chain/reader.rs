use super::abi::{AGENT_STAKING, CLAIM_TOKEN, MULTICALL3};
use crate::claims::{CallOutcome, ClaimKey, ClaimStatusReader};
use crate::config::{ChainRegistry, ConfigError, ContractKind};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use ethers::abi::{Detokenize, Token, Tokenize};
use ethers::contract::{BaseContract, Contract};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, U256};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

type Client = Provider<Http>;

/// Raw `balanceOf` / `swappableBalanceOf` reads for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalances {
    pub balance_of: CallOutcome<U256>,
    pub swappable_balance_of: CallOutcome<U256>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationState {
    pub balance: U256,
    pub is_listed_agent: bool,
}

/// Read-only chain queries used by the tool routes.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn token_balances(&self, chain_id: u64, account: Address) -> Result<TokenBalances>;

    async fn delegation_state(
        &self,
        chain_id: u64,
        account: Address,
        agent: Address,
    ) -> Result<DelegationState>;

    /// Base-token balance held by the virtual staking contract.
    async fn staking_pool_balance(&self, chain_id: u64) -> Result<U256>;
}

/// One entry of a Multicall3 `aggregate3` batch.
struct Call3 {
    target: Address,
    allow_failure: bool,
    data: Bytes,
}

impl Call3 {
    fn new<T: Tokenize>(
        target: Address,
        abi: &BaseContract,
        function: &str,
        args: T,
        allow_failure: bool,
    ) -> Result<Self> {
        let data = abi.encode(function, args).map_err(|e| AgentError::encoding(function, e))?;
        Ok(Self {
            target,
            allow_failure,
            data,
        })
    }

    fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.target),
            Token::Bool(self.allow_failure),
            Token::Bytes(self.data.to_vec()),
        ])
    }
}

/// JSON-RPC backed reader, one HTTP provider per configured chain.
pub struct EvmReader {
    registry: Arc<ChainRegistry>,
    providers: HashMap<u64, Arc<Client>>,
}

impl EvmReader {
    pub fn connect(registry: Arc<ChainRegistry>) -> Result<Self> {
        let mut providers = HashMap::new();
        for chain in registry.chains() {
            let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
                .map_err(|e| AgentError::chain_unavailable(chain.chain_id, e))?;
            info!("Connected RPC for {} ({}) at {}", chain.name, chain.chain_id, chain.rpc_url);
            providers.insert(chain.chain_id, Arc::new(provider));
        }
        Ok(Self { registry, providers })
    }

    fn provider(&self, chain_id: u64) -> Result<Arc<Client>> {
        self.providers
            .get(&chain_id)
            .cloned()
            .ok_or_else(|| AgentError::from(ConfigError::UnknownChain(chain_id)))
    }

    fn contract(&self, chain_id: u64, kind: ContractKind, abi: &BaseContract) -> Result<Contract<Client>> {
        let address = self.registry.contract(chain_id, kind)?;
        Ok(Contract::new(address, abi.clone(), self.provider(chain_id)?))
    }

    /// Run `calls` in one `aggregate3` round trip.
    ///
    /// Only the outer envelope is decoded here: one outcome per call, in call
    /// order, carrying the raw return data. Transport failures and a malformed
    /// or short envelope fail the whole batch.
    async fn aggregate(&self, chain_id: u64, calls: Vec<Call3>) -> Result<Vec<CallOutcome<Bytes>>> {
        let multicall = self.registry.contract(chain_id, ContractKind::Multicall)?;
        let provider = self.provider(chain_id)?;
        let expected = calls.len();

        let batch = Token::Array(calls.into_iter().map(Call3::into_token).collect());
        let input = MULTICALL3
            .abi()
            .function("aggregate3")
            .and_then(|f| f.encode_input(&[batch]))
            .map_err(|e| AgentError::encoding("aggregate3", e))?;
        let tx: TypedTransaction = TransactionRequest::new().to(multicall).data(input).into();

        let raw = provider
            .call(&tx, None)
            .await
            .map_err(|e| AgentError::chain_unavailable(chain_id, e))?;
        let results = decode_aggregate3(&raw).map_err(|e| AgentError::chain_unavailable(chain_id, e))?;

        if results.len() != expected {
            return Err(AgentError::chain_unavailable(
                chain_id,
                format!("multicall returned {} results for {} calls", results.len(), expected),
            ));
        }
        debug!("aggregate3 batch of {} on chain {}", expected, chain_id);
        Ok(results)
    }
}

fn revert_reason(data: &[u8]) -> String {
    format!("reverted with 0x{}", hex::encode(data))
}

fn decode_aggregate3(raw: &[u8]) -> std::result::Result<Vec<CallOutcome<Bytes>>, String> {
    let tokens = MULTICALL3
        .abi()
        .function("aggregate3")
        .and_then(|f| f.decode_output(raw))
        .map_err(|e| format!("malformed multicall result: {}", e))?;

    let entries = match tokens.as_slice() {
        [Token::Array(entries)] => entries,
        _ => return Err("malformed multicall result".to_string()),
    };
    entries
        .iter()
        .map(|entry| match entry {
            Token::Tuple(fields) => match fields.as_slice() {
                [Token::Bool(true), Token::Bytes(data)] => Ok(CallOutcome::Success(Bytes::from(data.clone()))),
                [Token::Bool(false), Token::Bytes(data)] => Ok(CallOutcome::Failed(revert_reason(data))),
                _ => Err("malformed multicall entry".to_string()),
            },
            _ => Err("malformed multicall entry".to_string()),
        })
        .collect()
}

/// Decode one call's return data; an undecodable return is a failed call.
fn decode_return<T: Detokenize>(
    abi: &BaseContract,
    function: &str,
    outcome: CallOutcome<Bytes>,
) -> CallOutcome<T> {
    match outcome {
        CallOutcome::Success(data) => match abi.decode_output::<T, _>(function, data) {
            Ok(value) => CallOutcome::Success(value),
            Err(e) => CallOutcome::Failed(format!("undecodable {} return: {}", function, e)),
        },
        CallOutcome::Failed(reason) => CallOutcome::Failed(reason),
    }
}

#[async_trait]
impl ClaimStatusReader for EvmReader {
    async fn claim_statuses(&self, chain_id: u64, keys: &[ClaimKey]) -> Result<Vec<CallOutcome<bool>>> {
        let token = self.registry.contract(chain_id, ContractKind::VirtualToken)?;
        let calls = keys
            .iter()
            .map(|key| {
                Call3::new(
                    token,
                    &CLAIM_TOKEN,
                    "isClaimed",
                    (key.tranche_id.clone(), U256::from(key.index)),
                    true,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let results = self.aggregate(chain_id, calls).await?;
        Ok(results
            .into_iter()
            .map(|outcome| decode_return(&CLAIM_TOKEN, "isClaimed", outcome))
            .collect())
    }
}

#[async_trait]
impl ChainReader for EvmReader {
    async fn token_balances(&self, chain_id: u64, account: Address) -> Result<TokenBalances> {
        let token = self.registry.contract(chain_id, ContractKind::VirtualToken)?;
        let calls = vec![
            Call3::new(token, &CLAIM_TOKEN, "balanceOf", account, true)?,
            Call3::new(token, &CLAIM_TOKEN, "swappableBalanceOf", account, true)?,
        ];

        let mut results = self.aggregate(chain_id, calls).await?.into_iter();
        let mut next = |function: &str| match results.next() {
            Some(outcome) => decode_return(&CLAIM_TOKEN, function, outcome),
            None => CallOutcome::Failed("missing result".to_string()),
        };
        let balance_of = next("balanceOf");
        let swappable_balance_of = next("swappableBalanceOf");
        Ok(TokenBalances {
            balance_of,
            swappable_balance_of,
        })
    }

    async fn delegation_state(
        &self,
        chain_id: u64,
        account: Address,
        agent: Address,
    ) -> Result<DelegationState> {
        let token = self.registry.contract(chain_id, ContractKind::VirtualToken)?;
        let staking = self.registry.contract(chain_id, ContractKind::AgentStaking)?;
        let calls = vec![
            Call3::new(token, &CLAIM_TOKEN, "balanceOf", account, false)?,
            Call3::new(staking, &AGENT_STAKING, "agents", agent, false)?,
        ];

        let mut results = self.aggregate(chain_id, calls).await?.into_iter();
        let balance = results
            .next()
            .map(|outcome| decode_return::<U256>(&CLAIM_TOKEN, "balanceOf", outcome));
        let listed = results
            .next()
            .map(|outcome| decode_return::<bool>(&AGENT_STAKING, "agents", outcome));

        match (balance, listed) {
            (Some(CallOutcome::Success(balance)), Some(CallOutcome::Success(is_listed_agent))) => {
                Ok(DelegationState {
                    balance,
                    is_listed_agent,
                })
            }
            other => Err(AgentError::contract_call(
                chain_id,
                format!("unexpected delegation reads: {:?}", other),
            )),
        }
    }

    async fn staking_pool_balance(&self, chain_id: u64) -> Result<U256> {
        let pool = self.registry.contract(chain_id, ContractKind::VirtualStaking)?;
        let token = self.contract(chain_id, ContractKind::Token, &CLAIM_TOKEN)?;
        token
            .method::<_, U256>("balanceOf", pool)
            .map_err(|e| AgentError::contract_call(chain_id, e))?
            .call()
            .await
            .map_err(|e| AgentError::contract_call(chain_id, e))
    }
}
