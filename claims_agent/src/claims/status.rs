use super::{ClaimKey, ClaimRecord};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use log::warn;

/// Result of one call inside a batched read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Success(T),
    Failed(String),
}

impl<T> CallOutcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            CallOutcome::Success(value) => Some(value),
            CallOutcome::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }
}

/// Batched `isClaimed(trancheId, index)` reads.
///
/// Returns one outcome per key, in key order. An `Err` means the batch could
/// not be dispatched at all.
#[async_trait]
pub trait ClaimStatusReader: Send + Sync {
    async fn claim_statuses(&self, chain_id: u64, keys: &[ClaimKey]) -> Result<Vec<CallOutcome<bool>>>;
}

/// A failed status read counts as unclaimed.
pub fn outcomes_to_flags(outcomes: Vec<CallOutcome<bool>>) -> Vec<bool> {
    outcomes
        .into_iter()
        .map(|outcome| match outcome {
            CallOutcome::Success(claimed) => claimed,
            CallOutcome::Failed(reason) => {
                warn!("isClaimed call failed, treating as unclaimed: {}", reason);
                false
            }
        })
        .collect()
}

pub async fn resolve_claimed(
    reader: &dyn ClaimStatusReader,
    chain_id: u64,
    records: &[ClaimRecord],
) -> Result<Vec<bool>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let keys: Vec<ClaimKey> = records.iter().map(ClaimRecord::key).collect();
    let outcomes = reader.claim_statuses(chain_id, &keys).await?;

    if outcomes.len() != keys.len() {
        return Err(AgentError::chain_unavailable(
            chain_id,
            format!("expected {} status results, got {}", keys.len(), outcomes.len()),
        ));
    }

    Ok(outcomes_to_flags(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;
    use num_bigint::BigUint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedReader {
        outcomes: Vec<CallOutcome<bool>>,
        calls: AtomicUsize,
    }

    impl ScriptedReader {
        fn new(outcomes: Vec<CallOutcome<bool>>) -> Self {
            Self {
                outcomes,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ClaimStatusReader for ScriptedReader {
        async fn claim_statuses(&self, _chain_id: u64, _keys: &[ClaimKey]) -> Result<Vec<CallOutcome<bool>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcomes.clone())
        }
    }

    struct DownReader;

    #[async_trait]
    impl ClaimStatusReader for DownReader {
        async fn claim_statuses(&self, chain_id: u64, _keys: &[ClaimKey]) -> Result<Vec<CallOutcome<bool>>> {
            Err(AgentError::chain_unavailable(chain_id, "connection refused"))
        }
    }

    fn records(n: u64) -> Vec<ClaimRecord> {
        (0..n)
            .map(|index| ClaimRecord {
                tranche_id: "1".into(),
                index,
                claim_type: 0,
                claimant: Address::zero(),
                claimable_amount: BigUint::from(1u8),
                proof: vec![],
            })
            .collect()
    }

    #[test]
    fn test_failed_outcomes_map_to_false() {
        let flags = outcomes_to_flags(vec![
            CallOutcome::Success(true),
            CallOutcome::Failed("execution reverted".into()),
            CallOutcome::Success(true),
        ]);
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_order() {
        let reader = ScriptedReader::new(vec![
            CallOutcome::Success(true),
            CallOutcome::Failed("decode error".into()),
            CallOutcome::Success(true),
        ]);
        let flags = resolve_claimed(&reader, 84532, &records(3)).await.unwrap();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_empty_input_skips_network() {
        let reader = ScriptedReader::new(vec![]);
        let flags = resolve_claimed(&reader, 84532, &[]).await.unwrap();
        assert!(flags.is_empty());
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_failure_propagates() {
        let err = resolve_claimed(&DownReader, 8453, &records(2)).await.unwrap_err();
        assert!(matches!(err, AgentError::ChainUnavailable { chain_id: 8453, .. }));
    }

    #[tokio::test]
    async fn test_short_batch_is_rejected() {
        let reader = ScriptedReader::new(vec![CallOutcome::Success(false)]);
        let err = resolve_claimed(&reader, 84532, &records(2)).await.unwrap_err();
        assert!(matches!(err, AgentError::ChainUnavailable { .. }));
    }
}
