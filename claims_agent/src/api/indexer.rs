//! GraphQL client for the agent staking indexer.

use crate::error::{AgentError, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const AGENT_QUERY: &str = "query GetAgents { AgentStaking_AgentSet { agent } }";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<AgentSetData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct AgentSetData {
    #[serde(rename = "AgentStaking_AgentSet")]
    agent_set: Vec<AgentEntry>,
}

#[derive(Debug, Deserialize)]
struct AgentEntry {
    agent: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

pub struct IndexerClient {
    client: Client,
    url: String,
}

impl IndexerClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::source_unavailable(format!("indexer client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Addresses registered with the agent staking contract, as indexed.
    pub async fn agents(&self) -> Result<Vec<String>> {
        let unavailable = |e: &dyn std::fmt::Display| {
            AgentError::source_unavailable(format!("agent indexer: {}", e))
        };

        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "query": AGENT_QUERY }))
            .send()
            .await
            .map_err(|e| unavailable(&e))?
            .error_for_status()
            .map_err(|e| unavailable(&e))?;

        let body: GraphQlResponse = response.json().await.map_err(|e| unavailable(&e))?;

        if let Some(first) = body.errors.first() {
            return Err(unavailable(&first.message));
        }
        let data = body.data.ok_or_else(|| unavailable(&"response has no data"))?;

        debug!("indexer returned {} agents", data.agent_set.len());
        Ok(data.agent_set.into_iter().map(|entry| entry.agent).collect())
    }
}
