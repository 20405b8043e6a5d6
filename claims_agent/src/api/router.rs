use crate::api::handlers::{actions, balance, claim, staking, summary};
use crate::api::indexer::IndexerClient;
use crate::api::openapi;
use crate::chain::ChainReader;
use crate::claims::SummaryAggregator;
use crate::config::{ChainRegistry, ServerConfig};
use axum::{extract::State, http::Method, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared handles injected into every route
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChainRegistry>,
    pub aggregator: SummaryAggregator,
    pub chain: Arc<dyn ChainReader>,
    pub indexer: Arc<IndexerClient>,
    pub server: Arc<ServerConfig>,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub chains: Vec<u64>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains: state.registry.chain_ids(),
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Agent discovery
        .route("/.well-known/ai-plugin.json", get(openapi::get_plugin_descriptor))
        .route("/api/ai-plugin", get(openapi::get_plugin_descriptor))
        // Queries
        .route("/api/tools/summary", get(summary::get_summary))
        .route("/api/tools/balance", get(balance::get_balance))
        .route("/api/tools/virtual-staking-status", get(staking::get_virtual_staking_status))
        .route("/api/tools/get-agents", get(staking::get_agents))
        // Transaction payloads
        .route("/api/tools/claim", get(claim::get_claim))
        .route("/api/tools/claim-many", get(claim::get_claim_many))
        .route("/api/tools/swap-all", get(actions::get_swap_all))
        .route("/api/tools/delegate", get(actions::get_delegate))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any),
        )
        .with_state(state)
}
