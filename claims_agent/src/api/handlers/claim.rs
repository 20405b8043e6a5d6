use super::respond;
use crate::api::errors::{ApiError, ApiResult};
use crate::api::validation::QueryParams;
use crate::api::AppState;
use crate::chain::{encode_claim, encode_claim_many, SignRequest};
use crate::claims::{decimal_amount, ClaimRecord};
use crate::config::ContractKind;
use axum::{
    extract::{Query, State},
    Json,
};
use num_bigint::BigUint;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimMeta {
    pub tranche_id: String,
    pub index: u64,
    #[serde(with = "decimal_amount")]
    pub amount: BigUint,
}

impl From<&ClaimRecord> for ClaimMeta {
    fn from(record: &ClaimRecord) -> Self {
        Self {
            tranche_id: record.tranche_id.clone(),
            index: record.index,
            amount: record.claimable_amount.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse<M> {
    pub success: bool,
    pub transaction: SignRequest,
    pub meta: M,
}

fn find_claim(claims: &[ClaimRecord], tranche_id: u64, index: u64) -> Option<&ClaimRecord> {
    let tranche_id = tranche_id.to_string();
    claims
        .iter()
        .find(|c| c.tranche_id == tranche_id && c.index == index)
}

/// Unsigned `claim` transaction for one of the claimant's merkle entries
pub async fn get_claim(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<ClaimResponse<ClaimMeta>>> {
    respond("Claim", claim(&state, &raw).await)
}

async fn claim(state: &AppState, raw: &HashMap<String, String>) -> ApiResult<ClaimResponse<ClaimMeta>> {
    let params = QueryParams::new(raw);
    let claimant = params.address("claimant")?;
    let chain_id = params.chain_id(&state.registry)?;
    let tranche_id = params.number("trancheId")?;
    let index = params.number("index")?;

    let token = state.registry.contract(chain_id, ContractKind::VirtualToken)?;
    let claims = state.aggregator.claims_for(claimant).await?;
    let target = find_claim(&claims, tranche_id, index).ok_or_else(|| {
        ApiError::bad_request(&format!(
            "No claim found for tranche {}, index {}",
            tranche_id, index
        ))
    })?;

    let data = encode_claim(target, claimant)?;
    Ok(ClaimResponse {
        success: true,
        transaction: SignRequest::new(chain_id, None, token, data),
        meta: ClaimMeta::from(target),
    })
}

/// Unsigned `claimMany` transaction covering several entries at once
pub async fn get_claim_many(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<ClaimResponse<Vec<ClaimMeta>>>> {
    respond("ClaimMany", claim_many(&state, &raw).await)
}

async fn claim_many(
    state: &AppState,
    raw: &HashMap<String, String>,
) -> ApiResult<ClaimResponse<Vec<ClaimMeta>>> {
    let params = QueryParams::new(raw);
    let claimant = params.address("claimant")?;
    let chain_id = params.chain_id(&state.registry)?;
    let tranche_ids = params.number_list("trancheIds")?;
    let indices = params.number_list("indices")?;

    if tranche_ids.len() != indices.len() || tranche_ids.is_empty() {
        return Err(ApiError::bad_request(
            "trancheIds and indices arrays must match in length and not be empty",
        ));
    }

    let token = state.registry.contract(chain_id, ContractKind::VirtualToken)?;
    let claims = state.aggregator.claims_for(claimant).await?;

    let mut targets = Vec::with_capacity(tranche_ids.len());
    for (&tranche_id, &index) in tranche_ids.iter().zip(&indices) {
        let target = find_claim(&claims, tranche_id, index).ok_or_else(|| {
            ApiError::bad_request(&format!(
                "No claim found for trancheId={}, index={}",
                tranche_id, index
            ))
        })?;
        targets.push(target.clone());
    }

    let data = encode_claim_many(&targets, claimant)?;
    Ok(ClaimResponse {
        success: true,
        transaction: SignRequest::new(chain_id, None, token, data),
        meta: targets.iter().map(ClaimMeta::from).collect(),
    })
}
