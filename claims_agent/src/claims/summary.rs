use super::status::resolve_claimed;
use super::{enrich, ClaimRecord, ClaimSource, ClaimStatusReader, EnrichedClaimRecord, SummaryMeta, SummaryResult};
use crate::error::Result;
use ethers::types::Address;
use log::debug;
use num_bigint::BigUint;
use std::collections::HashSet;
use std::sync::Arc;

/// Builds per-claimant summaries from the claim source and on-chain status.
#[derive(Clone)]
pub struct SummaryAggregator {
    source: Arc<dyn ClaimSource>,
    statuses: Arc<dyn ClaimStatusReader>,
}

impl SummaryAggregator {
    pub fn new(source: Arc<dyn ClaimSource>, statuses: Arc<dyn ClaimStatusReader>) -> Self {
        Self { source, statuses }
    }

    pub fn source(&self) -> &Arc<dyn ClaimSource> {
        &self.source
    }

    /// All claims of `claimant`, in document order.
    pub async fn claims_for(&self, claimant: Address) -> Result<Vec<ClaimRecord>> {
        let all = self.source.fetch_claims().await?;
        // addresses are compared on their bytes, which makes the hex casing irrelevant
        Ok(all.iter().filter(|c| c.claimant == claimant).cloned().collect())
    }

    pub async fn summarize(
        &self,
        claimant: Address,
        chain_id: u64,
        include_status: bool,
    ) -> Result<SummaryResult> {
        let filtered = self.claims_for(claimant).await?;

        let statuses = if include_status && !filtered.is_empty() {
            resolve_claimed(self.statuses.as_ref(), chain_id, &filtered).await?
        } else {
            vec![false; filtered.len()]
        };

        let claims: Vec<EnrichedClaimRecord> = filtered
            .into_iter()
            .zip(statuses)
            .map(|(record, claimed)| enrich(record, chain_id, claimed))
            .collect();

        debug!(
            "summary for {:?} on chain {}: {} claims",
            claimant,
            chain_id,
            claims.len()
        );
        Ok(build_summary(claims))
    }
}

/// Attach aggregate totals to an already enriched claim list.
pub fn build_summary(claims: Vec<EnrichedClaimRecord>) -> SummaryResult {
    let total_amount = claims
        .iter()
        .fold(BigUint::default(), |sum, c| sum + &c.record.claimable_amount);

    let tranche_ids: Vec<String> = {
        let mut seen = HashSet::new();
        claims
            .iter()
            .filter(|c| seen.insert(c.record.tranche_id.as_str()))
            .map(|c| c.record.tranche_id.clone())
            .collect()
    };

    let claimed_count = claims.iter().filter(|c| c.claimed).count();
    let unclaimed_count = claims.len() - claimed_count;

    SummaryResult {
        meta: SummaryMeta {
            total_amount,
            tranche_ids,
            claimed_count,
            unclaimed_count,
        },
        claims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{CallOutcome, ClaimKey};
    use crate::error::AgentError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticSource(Vec<ClaimRecord>);

    #[async_trait]
    impl ClaimSource for StaticSource {
        async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>> {
            Ok(Arc::new(self.0.clone()))
        }
    }

    #[derive(Default)]
    struct RecordingReader {
        requested: Mutex<Vec<Vec<ClaimKey>>>,
    }

    #[async_trait]
    impl ClaimStatusReader for RecordingReader {
        async fn claim_statuses(&self, _chain_id: u64, keys: &[ClaimKey]) -> Result<Vec<CallOutcome<bool>>> {
            self.requested.lock().unwrap().push(keys.to_vec());
            // odd indices are claimed
            Ok(keys.iter().map(|k| CallOutcome::Success(k.index % 2 == 1)).collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ClaimSource for FailingSource {
        async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>> {
            Err(AgentError::source_unavailable("404 Not Found"))
        }
    }

    fn claim(tranche: &str, index: u64, claimant: Address, amount: u64) -> ClaimRecord {
        ClaimRecord {
            tranche_id: tranche.into(),
            index,
            claim_type: 1,
            claimant,
            claimable_amount: BigUint::from(amount),
            proof: vec![],
        }
    }

    #[tokio::test]
    async fn test_status_requested_for_filtered_claims_only() {
        let alice = Address::repeat_byte(0x01);
        let bob = Address::repeat_byte(0x02);
        let source = StaticSource(vec![
            claim("1", 0, alice, 10),
            claim("1", 1, bob, 20),
            claim("2", 1, alice, 30),
        ]);
        let reader = Arc::new(RecordingReader::default());
        let aggregator = SummaryAggregator::new(Arc::new(source), reader.clone());

        let summary = aggregator.summarize(alice, 8453, true).await.unwrap();

        let requested = reader.requested.lock().unwrap().clone();
        assert_eq!(requested.len(), 1);
        assert_eq!(
            requested[0],
            vec![
                ClaimKey { tranche_id: "1".into(), index: 0 },
                ClaimKey { tranche_id: "2".into(), index: 1 },
            ]
        );
        assert_eq!(summary.claims.len(), 2);
        assert!(!summary.claims[0].claimed);
        assert!(summary.claims[1].claimed);
        assert_eq!(summary.meta.total_amount, BigUint::from(40u8));
        assert_eq!(summary.meta.claimed_count, 1);
        assert_eq!(summary.meta.unclaimed_count, 1);
    }

    #[tokio::test]
    async fn test_without_status_everything_is_unclaimed() {
        let alice = Address::repeat_byte(0x01);
        let reader = Arc::new(RecordingReader::default());
        let aggregator = SummaryAggregator::new(
            Arc::new(StaticSource(vec![claim("1", 1, alice, 10)])),
            reader.clone(),
        );

        let summary = aggregator.summarize(alice, 8453, false).await.unwrap();
        assert!(reader.requested.lock().unwrap().is_empty());
        assert!(!summary.claims[0].claimed);
        assert_eq!(summary.meta.unclaimed_count, 1);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let aggregator =
            SummaryAggregator::new(Arc::new(FailingSource), Arc::new(RecordingReader::default()));
        let err = aggregator
            .summarize(Address::zero(), 8453, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::SourceUnavailable(_)));
    }

    #[test]
    fn test_tranche_ids_keep_first_seen_order() {
        let alice = Address::repeat_byte(0x01);
        let claims = ["7", "2", "7", "10", "2"]
            .iter()
            .enumerate()
            .map(|(i, t)| enrich(claim(t, i as u64, alice, 1), 8453, false))
            .collect();

        let summary = build_summary(claims);
        assert_eq!(summary.meta.tranche_ids, vec!["7", "2", "10"]);
        assert_eq!(summary.meta.total_amount, BigUint::from(5u8));
    }

    #[test]
    fn test_empty_summary() {
        let summary = build_summary(Vec::new());
        assert!(summary.claims.is_empty());
        assert_eq!(summary.meta.total_amount.to_string(), "0");
        assert!(summary.meta.tranche_ids.is_empty());
        assert_eq!(summary.meta.claimed_count, 0);
        assert_eq!(summary.meta.unclaimed_count, 0);
    }
}
