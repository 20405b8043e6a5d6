use super::respond;
use crate::api::errors::ApiResult;
use crate::api::validation::QueryParams;
use crate::api::AppState;
use crate::claims::{EnrichedClaimRecord, SummaryMeta};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub claims: Vec<EnrichedClaimRecord>,
    pub meta: SummaryResponseMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponseMeta {
    #[serde(flatten)]
    pub summary: SummaryMeta,
    pub chain_id: u64,
}

/// Claims of one claimant with vesting metadata and on-chain claimed status
pub async fn get_summary(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<SummaryResponse>> {
    respond("Summary", summarize(&state, &raw).await)
}

async fn summarize(state: &AppState, raw: &HashMap<String, String>) -> ApiResult<SummaryResponse> {
    let params = QueryParams::new(raw);
    let claimant = params.address("claimant")?;
    let chain_id = params.chain_id(&state.registry)?;

    let result = state.aggregator.summarize(claimant, chain_id, true).await?;

    Ok(SummaryResponse {
        success: true,
        claims: result.claims,
        meta: SummaryResponseMeta {
            summary: result.meta,
            chain_id,
        },
    })
}
