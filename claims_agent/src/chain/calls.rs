//! Calldata for the user actions and the unsigned transaction payload handed
//! back to the agent's wallet.

use super::abi::CLAIM_TOKEN;
use crate::claims::ClaimRecord;
use crate::error::{AgentError, Result};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::to_checksum;
use num_bigint::BigUint;
use serde::Serialize;

/// Unsigned `eth_sendTransaction` request for the agent's wallet to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub method: &'static str,
    pub chain_id: u64,
    pub params: Vec<MetaTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub value: String,
    pub data: String,
}

impl SignRequest {
    pub fn new(chain_id: u64, from: Option<Address>, to: Address, data: Bytes) -> Self {
        Self {
            method: "eth_sendTransaction",
            chain_id,
            params: vec![MetaTransaction {
                from: from.map(|a| to_checksum(&a, None)),
                to: to_checksum(&to, None),
                value: "0x0".to_string(),
                data: format!("0x{}", hex::encode(&data)),
            }],
        }
    }
}

pub fn biguint_to_u256(value: &BigUint) -> Option<U256> {
    let bytes = value.to_bytes_be();
    (bytes.len() <= 32).then(|| U256::from_big_endian(&bytes))
}

fn amount(record: &ClaimRecord) -> Result<U256> {
    biguint_to_u256(&record.claimable_amount).ok_or_else(|| {
        AgentError::validation("claimableAmount", "amount does not fit in uint256")
    })
}

fn tranche(record: &ClaimRecord) -> Result<U256> {
    U256::from_dec_str(&record.tranche_id).map_err(|_| {
        AgentError::validation(
            "trancheId",
            format!("tranche '{}' is not numeric", record.tranche_id),
        )
    })
}

pub fn encode_claim(record: &ClaimRecord, claimant: Address) -> Result<Bytes> {
    let amount = amount(record)?;
    CLAIM_TOKEN
        .encode(
            "claim",
            (
                tranche(record)?,
                U256::from(record.index),
                U256::from(record.claim_type),
                claimant,
                amount,
                amount,
                record.proof.clone(),
            ),
        )
        .map_err(|e| AgentError::encoding("claim", e))
}

pub fn encode_claim_many(records: &[ClaimRecord], claimant: Address) -> Result<Bytes> {
    let mut tranche_ids = Vec::with_capacity(records.len());
    let mut amounts = Vec::with_capacity(records.len());
    for record in records {
        tranche_ids.push(tranche(record)?);
        amounts.push(amount(record)?);
    }

    CLAIM_TOKEN
        .encode(
            "claimMany",
            (
                tranche_ids,
                records.iter().map(|r| U256::from(r.index)).collect::<Vec<_>>(),
                records.iter().map(|r| U256::from(r.claim_type)).collect::<Vec<_>>(),
                vec![claimant; records.len()],
                amounts.clone(),
                amounts,
                records.iter().map(|r| r.proof.clone()).collect::<Vec<_>>(),
                vec![U256::zero(); records.len()],
            ),
        )
        .map_err(|e| AgentError::encoding("claimMany", e))
}

pub fn encode_swap_all() -> Result<Bytes> {
    CLAIM_TOKEN
        .encode("swapAll", ())
        .map_err(|e| AgentError::encoding("swapAll", e))
}

pub fn encode_delegate(agent: Address, amount: U256) -> Result<Bytes> {
    CLAIM_TOKEN
        .encode("delegate", (agent, amount))
        .map_err(|e| AgentError::encoding("delegate", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::H256;

    fn record(tranche_id: &str, index: u64, amount: u64) -> ClaimRecord {
        ClaimRecord {
            tranche_id: tranche_id.into(),
            index,
            claim_type: 4,
            claimant: Address::repeat_byte(0xaa),
            claimable_amount: BigUint::from(amount),
            proof: vec![H256::repeat_byte(0x01), H256::repeat_byte(0x02)],
        }
    }

    fn word(data: &Bytes, n: usize) -> &[u8] {
        &data[4 + n * 32..4 + (n + 1) * 32]
    }

    #[test]
    fn test_claim_calldata_layout() {
        let claimant = Address::repeat_byte(0xaa);
        let data = encode_claim(&record("3", 1, 7777), claimant).unwrap();

        assert_eq!(hex::encode(&data[..4]), "ed99c65b");
        assert_eq!(U256::from_big_endian(word(&data, 0)), U256::from(3));
        assert_eq!(U256::from_big_endian(word(&data, 1)), U256::from(1));
        assert_eq!(U256::from_big_endian(word(&data, 2)), U256::from(4));
        assert_eq!(&word(&data, 3)[12..], claimant.as_bytes());
        assert_eq!(U256::from_big_endian(word(&data, 4)), U256::from(7777));
        assert_eq!(U256::from_big_endian(word(&data, 5)), U256::from(7777));
        // head (7 words) + proof length + 2 proof elements
        assert_eq!(data.len(), 4 + 10 * 32);
    }

    #[test]
    fn test_claim_rejects_non_numeric_tranche() {
        let err = encode_claim(&record("alpha", 0, 1), Address::zero()).unwrap_err();
        assert!(matches!(err, AgentError::Validation { .. }));
    }

    #[test]
    fn test_claim_many_selector() {
        let records = vec![record("0", 9, 10000), record("3", 1, 7777)];
        let data = encode_claim_many(&records, Address::repeat_byte(0xaa)).unwrap();
        assert_eq!(hex::encode(&data[..4]), "d8761f89");
    }

    #[test]
    fn test_simple_action_calldata() {
        assert_eq!(hex::encode(encode_swap_all().unwrap()), "3e9ffbea");

        let data = encode_delegate(Address::repeat_byte(0x22), U256::exp10(18)).unwrap();
        assert_eq!(hex::encode(&data[..4]), "026e402b");
        assert_eq!(data.len(), 4 + 2 * 32);
    }

    #[test]
    fn test_amount_conversion_bounds() {
        let max = (BigUint::from(1u8) << 256) - 1u8;
        assert_eq!(biguint_to_u256(&max), Some(U256::MAX));
        assert_eq!(biguint_to_u256(&(max + 1u8)), None);
    }

    #[test]
    fn test_sign_request_shape() {
        let request = SignRequest::new(
            84532,
            Some(Address::repeat_byte(0xaa)),
            Address::repeat_byte(0xaa),
            Bytes::from(vec![0x3e, 0x9f, 0xfb, 0xea]),
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "eth_sendTransaction");
        assert_eq!(json["chainId"], 84532);
        assert_eq!(json["params"][0]["from"], "0xaAaAaAaaAaAaAaaAaAAAAAAAAaaaAaAaAaaAaaAa");
        assert_eq!(json["params"][0]["value"], "0x0");
        assert_eq!(json["params"][0]["data"], "0x3e9ffbea");

        let anonymous = SignRequest::new(1, None, Address::zero(), Bytes::default());
        let json = serde_json::to_value(&anonymous).unwrap();
        assert!(json["params"][0].get("from").is_none());
    }
}
