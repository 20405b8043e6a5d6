use super::respond;
use crate::api::errors::{ApiError, ApiResult};
use crate::api::validation::QueryParams;
use crate::api::AppState;
use crate::chain::{encode_delegate, encode_swap_all, SignRequest};
use crate::config::ContractKind;
use axum::{
    extract::{Query, State},
    Json,
};
use ethers::utils::to_checksum;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct SwapAllResponse {
    pub success: bool,
    pub transaction: SignRequest,
}

#[derive(Debug, Serialize)]
pub struct DelegateResponse {
    pub success: bool,
    pub transaction: SignRequest,
    pub meta: DelegateMeta,
}

#[derive(Debug, Serialize)]
pub struct DelegateMeta {
    /// Amount as requested, in whole tokens
    pub amount: String,
}

/// Unsigned `swapAll` transaction from the claimant
pub async fn get_swap_all(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<SwapAllResponse>> {
    respond("SwapAll", swap_all(&state, &raw).await)
}

async fn swap_all(state: &AppState, raw: &HashMap<String, String>) -> ApiResult<SwapAllResponse> {
    let params = QueryParams::new(raw);
    let claimant = params.address("claimant")?;
    let chain_id = params.chain_id(&state.registry)?;

    let token = state.registry.contract(chain_id, ContractKind::VirtualToken)?;
    Ok(SwapAllResponse {
        success: true,
        transaction: SignRequest::new(chain_id, Some(claimant), token, encode_swap_all()?),
    })
}

/// Unsigned `delegate` transaction, after checking balance and agent listing
pub async fn get_delegate(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<DelegateResponse>> {
    respond("Stake", delegate(&state, &raw).await)
}

async fn delegate(state: &AppState, raw: &HashMap<String, String>) -> ApiResult<DelegateResponse> {
    let params = QueryParams::new(raw);
    let claimant = params.address("claimant")?;
    let chain_id = params.chain_id(&state.registry)?;
    let agent = params.address("agent")?;
    let amount = params.ether_amount("amount")?;

    let token = state.registry.contract(chain_id, ContractKind::VirtualToken)?;
    let delegation = state.chain.delegation_state(chain_id, claimant, agent).await?;

    if amount > delegation.balance {
        return Err(ApiError::insufficient_balance(
            &delegation.balance.to_string(),
            &amount.to_string(),
        ));
    }

    if !delegation.is_listed_agent {
        return Err(ApiError::bad_request(&format!(
            "Agent {} is not registered in the staking contract.",
            to_checksum(&agent, None)
        )));
    }

    Ok(DelegateResponse {
        success: true,
        transaction: SignRequest::new(chain_id, Some(claimant), token, encode_delegate(agent, amount)?),
        meta: DelegateMeta {
            amount: params.required("amount")?.trim().to_string(),
        },
    })
}
