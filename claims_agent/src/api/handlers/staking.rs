use super::respond;
use crate::api::errors::ApiResult;
use crate::api::validation::QueryParams;
use crate::api::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualStakingStatus {
    pub success: bool,
    pub can_virtual_stake: bool,
    pub chain_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentList {
    pub success: bool,
    pub chain_id: u64,
    pub agents: Vec<String>,
}

/// Whether the virtual staking pool holds any base tokens
pub async fn get_virtual_staking_status(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<VirtualStakingStatus>> {
    respond("VirtualStakeStatus", virtual_staking_status(&state, &raw).await)
}

async fn virtual_staking_status(
    state: &AppState,
    raw: &HashMap<String, String>,
) -> ApiResult<VirtualStakingStatus> {
    let chain_id = QueryParams::new(raw).chain_id(&state.registry)?;
    let balance = state.chain.staking_pool_balance(chain_id).await?;

    Ok(VirtualStakingStatus {
        success: true,
        can_virtual_stake: !balance.is_zero(),
        chain_id,
    })
}

/// Agents registered for staking, as seen by the indexer
pub async fn get_agents(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<AgentList>> {
    respond("GetAgents", agents(&state, &raw).await)
}

async fn agents(state: &AppState, raw: &HashMap<String, String>) -> ApiResult<AgentList> {
    let chain_id = QueryParams::new(raw).chain_id(&state.registry)?;
    let agents = state.indexer.agents().await?;

    Ok(AgentList {
        success: true,
        chain_id,
        agents,
    })
}
