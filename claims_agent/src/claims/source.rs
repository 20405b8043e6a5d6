//! Remote merkle claim document.
//!
//! The document maps tranche ids to `{root, data}`; rows do not carry their
//! tranche id, it is injected from the key while flattening.

use super::{checksum_address, decimal_amount, ClaimRecord};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use ethers::types::{Address, H256};
use log::{debug, info};
use num_bigint::BigUint;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Provider of the full, flattened claim list.
///
/// Implementations may serve a cached snapshot; callers must not assume the
/// data is fresh.
#[async_trait]
pub trait ClaimSource: Send + Sync {
    async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>>;
}

#[derive(Debug, Deserialize)]
struct TrancheDocument {
    root: String,
    data: Vec<ClaimRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimRow {
    index: u64,
    claim_type: u32,
    #[serde(with = "checksum_address")]
    claimant: Address,
    #[serde(with = "decimal_amount")]
    claimable_amount: BigUint,
    proof: Vec<H256>,
}

/// Tranche keys that are canonical non-negative integers sort first, in
/// numeric order; everything else follows in document order.
fn tranche_order(key: &str) -> (u8, u32) {
    match key.parse::<u32>() {
        Ok(n) if n.to_string() == key => (0, n),
        _ => (1, 0),
    }
}

/// Flatten a claim document. Any malformed tranche or row fails the whole
/// document.
pub fn parse_claim_document(body: &[u8]) -> Result<Vec<ClaimRecord>> {
    let document: serde_json::Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| AgentError::source_unavailable(format!("invalid claim document: {}", e)))?;

    let mut tranches: Vec<(String, Value)> = document.into_iter().collect();
    tranches.sort_by_key(|(key, _)| tranche_order(key));

    let mut claims = Vec::new();
    for (tranche_id, value) in tranches {
        let tranche: TrancheDocument = serde_json::from_value(value).map_err(|e| {
            AgentError::source_unavailable(format!("invalid tranche '{}': {}", tranche_id, e))
        })?;
        debug!(
            "tranche {} (root {}) has {} rows",
            tranche_id,
            tranche.root,
            tranche.data.len()
        );

        claims.extend(tranche.data.into_iter().map(|row| ClaimRecord {
            tranche_id: tranche_id.clone(),
            index: row.index,
            claim_type: row.claim_type,
            claimant: row.claimant,
            claimable_amount: row.claimable_amount,
            proof: row.proof,
        }));
    }

    Ok(claims)
}

/// Fetches the claim document over HTTP on every call.
pub struct HttpClaimSource {
    client: Client,
    url: String,
}

impl HttpClaimSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::source_unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ClaimSource for HttpClaimSource {
    async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AgentError::source_unavailable(format!("failed to fetch claims: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgentError::source_unavailable(format!(
                "failed to fetch claims: {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AgentError::source_unavailable(format!("failed to read claims: {}", e)))?;

        let claims = parse_claim_document(&body)?;
        info!("Fetched {} merkle claims from {}", claims.len(), self.url);
        Ok(Arc::new(claims))
    }
}
