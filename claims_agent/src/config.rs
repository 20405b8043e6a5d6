//! Agent configuration and the per-chain contract registry.
//!
//! Settings are layered with the `config` crate: the bundled
//! `config/default.toml`, then an optional file, then `CLAIMS_AGENT__*`
//! environment variables.

use config::{Environment, File, FileFormat};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported chain id: {0}")]
    UnknownChain(u64),

    #[error("No address configured for {contract} on chain {chain_id}")]
    MissingAddress {
        contract: ContractKind,
        chain_id: u64,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub claims: ClaimsConfig,
    pub indexer: IndexerConfig,
    pub chains: Vec<ChainConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL advertised in the OpenAPI descriptor
    pub plugin_url: String,
    /// Account that owns the agent on the agent registry
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsConfig {
    pub merkle_url: String,
    /// Zero disables caching
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl ClaimsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub graphql_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    #[serde(default)]
    pub contracts: ContractAddresses,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub token: Option<Address>,
    pub virtual_token: Option<Address>,
    pub agent_staking: Option<Address>,
    pub virtual_staking: Option<Address>,
    pub multicall: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    Token,
    VirtualToken,
    AgentStaking,
    VirtualStaking,
    Multicall,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractKind::Token => "token",
            ContractKind::VirtualToken => "virtual token",
            ContractKind::AgentStaking => "agent staking",
            ContractKind::VirtualStaking => "virtual staking",
            ContractKind::Multicall => "multicall",
        };
        f.write_str(name)
    }
}

impl ContractAddresses {
    pub fn get(&self, kind: ContractKind) -> Option<Address> {
        match kind {
            ContractKind::Token => self.token,
            ContractKind::VirtualToken => self.virtual_token,
            ContractKind::AgentStaking => self.agent_staking,
            ContractKind::VirtualStaking => self.virtual_staking,
            ContractKind::Multicall => self.multicall,
        }
    }
}

impl AgentConfig {
    /// Load the layered configuration. `path` is optional; when given, the
    /// file must exist and its format is picked from the extension.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("CLAIMS_AGENT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AgentConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::Invalid("at least one chain must be configured".into()));
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.chain_id) {
                return Err(ConfigError::Invalid(format!(
                    "chain {} is configured more than once",
                    chain.chain_id
                )));
            }
            reqwest::Url::parse(&chain.rpc_url).map_err(|e| {
                ConfigError::Invalid(format!("chain {} rpc_url: {}", chain.chain_id, e))
            })?;
        }

        reqwest::Url::parse(&self.claims.merkle_url)
            .map_err(|e| ConfigError::Invalid(format!("claims.merkle_url: {}", e)))?;
        reqwest::Url::parse(&self.indexer.graphql_url)
            .map_err(|e| ConfigError::Invalid(format!("indexer.graphql_url: {}", e)))?;

        if self.claims.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "claims.request_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    pub fn registry(&self) -> ChainRegistry {
        ChainRegistry::new(self.chains.clone())
    }
}

/// Chain id → chain settings lookup, injected wherever a per-chain contract
/// address is needed.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: Vec<ChainConfig>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.chain_id, c)).collect(),
        }
    }

    pub fn supports(&self, chain_id: u64) -> bool {
        self.chains.contains_key(&chain_id)
    }

    pub fn chain(&self, chain_id: u64) -> Result<&ChainConfig, ConfigError> {
        self.chains
            .get(&chain_id)
            .ok_or(ConfigError::UnknownChain(chain_id))
    }

    pub fn contract(&self, chain_id: u64, kind: ContractKind) -> Result<Address, ConfigError> {
        self.chain(chain_id)?
            .contracts
            .get(kind)
            .ok_or(ConfigError::MissingAddress {
                contract: kind,
                chain_id,
            })
    }

    /// Configured chain ids, ascending.
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.chains.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }
}
