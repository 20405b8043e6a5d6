//! Merkle claim pipeline: sourcing, enrichment, on-chain status and the
//! per-claimant summary.

pub mod cache;
pub mod enrich;
pub mod source;
pub mod status;
pub mod summary;

pub use cache::CachedClaimSource;
pub use enrich::{enrich, DurationUnit, TEST_NETWORK_CHAIN_ID};
pub use source::{parse_claim_document, ClaimSource, HttpClaimSource};
pub use status::{resolve_claimed, CallOutcome, ClaimStatusReader};
pub use summary::{build_summary, SummaryAggregator};

use ethers::types::{Address, H256};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// One `(trancheId, index)` entry of the merkle distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub tranche_id: String,
    pub index: u64,
    pub claim_type: u32,
    #[serde(with = "checksum_address")]
    pub claimant: Address,
    #[serde(with = "decimal_amount")]
    pub claimable_amount: BigUint,
    pub proof: Vec<H256>,
}

impl ClaimRecord {
    pub fn key(&self) -> ClaimKey {
        ClaimKey {
            tranche_id: self.tranche_id.clone(),
            index: self.index,
        }
    }
}

/// Natural key of a claim, and the argument pair of `isClaimed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimKey {
    pub tranche_id: String,
    pub index: u64,
}

/// A claim record with display-oriented vesting metadata and claimed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedClaimRecord {
    #[serde(flatten)]
    pub record: ClaimRecord,
    pub claim_type_name: &'static str,
    pub cliff: String,
    pub vesting: String,
    pub claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMeta {
    #[serde(with = "decimal_amount")]
    pub total_amount: BigUint,
    pub tranche_ids: Vec<String>,
    pub claimed_count: usize,
    pub unclaimed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub claims: Vec<EnrichedClaimRecord>,
    pub meta: SummaryMeta,
}

/// Amounts travel as base-10 strings; they routinely exceed 64 bits.
pub mod decimal_amount {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// Strict parse: ASCII digits only, no sign, no whitespace.
    pub fn parse(raw: &str) -> Result<BigUint, String> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid decimal amount '{}'", raw));
        }
        raw.parse::<BigUint>()
            .map_err(|e| format!("invalid decimal amount '{}': {}", raw, e))
    }
}

/// Addresses are parsed case-insensitively and rendered EIP-55 checksummed.
pub mod checksum_address {
    use ethers::types::Address;
    use ethers::utils::to_checksum;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_checksum(value, None))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        Address::deserialize(deserializer)
    }
}
