use super::respond;
use crate::api::errors::{ApiError, ApiResult};
use crate::api::validation::QueryParams;
use crate::api::AppState;
use crate::claims::{checksum_address, CallOutcome};
use axum::{
    extract::{Query, State},
    Json,
};
use ethers::types::Address;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub data: BalanceData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceData {
    pub balance_of: String,
    pub swappable_balance_of: String,
    pub chain_id: u64,
    #[serde(with = "checksum_address")]
    pub claimant: Address,
}

/// Virtual token balance and the part of it that can be swapped
pub async fn get_balance(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<BalanceResponse>> {
    respond("Balance", balance(&state, &raw).await)
}

async fn balance(state: &AppState, raw: &HashMap<String, String>) -> ApiResult<BalanceResponse> {
    let params = QueryParams::new(raw);
    let claimant = params.address("claimant")?;
    let chain_id = params.chain_id(&state.registry)?;

    let balances = state.chain.token_balances(chain_id, claimant).await?;

    match (balances.balance_of, balances.swappable_balance_of) {
        (CallOutcome::Success(balance_of), CallOutcome::Success(swappable)) => Ok(BalanceResponse {
            success: true,
            data: BalanceData {
                balance_of: balance_of.to_string(),
                swappable_balance_of: swappable.to_string(),
                chain_id,
                claimant,
            },
        }),
        (balance_of, swappable) => {
            let reason = |outcome: &CallOutcome<_>| match outcome {
                CallOutcome::Failed(reason) => Some(reason.clone()),
                CallOutcome::Success(_) => None,
            };
            Err(ApiError::with_details(
                500,
                "Failed to fetch balances".to_string(),
                serde_json::json!({
                    "balanceOf": reason(&balance_of),
                    "swappableBalanceOf": reason(&swappable),
                }),
            ))
        }
    }
}
