use crate::config::ConfigError;

/// Failure kinds surfaced by the claim pipeline and chain reads.
///
/// The route layer maps each variant to its own HTTP status, so variants stay
/// coarse: callers need to tell *which* collaborator failed, not why.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Claim source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Chain {chain_id} unavailable: {reason}")]
    ChainUnavailable { chain_id: u64, reason: String },

    #[error("Contract call failed on chain {chain_id}: {reason}")]
    ContractCall { chain_id: u64, reason: String },

    #[error("Failed to encode {function} call: {reason}")]
    Encoding { function: String, reason: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AgentError {
    pub fn source_unavailable(reason: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable(reason.to_string())
    }

    pub fn chain_unavailable(chain_id: u64, reason: impl std::fmt::Display) -> Self {
        Self::ChainUnavailable {
            chain_id,
            reason: reason.to_string(),
        }
    }

    pub fn contract_call(chain_id: u64, reason: impl std::fmt::Display) -> Self {
        Self::ContractCall {
            chain_id,
            reason: reason.to_string(),
        }
    }

    pub fn encoding(function: &str, reason: impl std::fmt::Display) -> Self {
        Self::Encoding {
            function: function.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn validation(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
