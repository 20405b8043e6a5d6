//! API error responses for the tool routes

use crate::config::ConfigError;
use crate::error::AgentError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON error body returned by every tool route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: u64,
}

impl ApiError {
    pub fn new(code: u16, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            timestamp: chrono::Utc::now().timestamp() as u64,
        }
    }

    pub fn with_details(code: u16, message: String, details: serde_json::Value) -> Self {
        Self {
            code,
            message,
            details: Some(details),
            timestamp: chrono::Utc::now().timestamp() as u64,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(400, message.to_string())
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::new(500, message.to_string())
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new(502, message.to_string())
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::with_details(
            400,
            reason.to_string(),
            serde_json::json!({
                "field": field,
                "reason": reason
            }),
        )
    }

    pub fn insufficient_balance(available: &str, required: &str) -> Self {
        Self::with_details(
            400,
            format!(
                "Insufficient balance. Available: {}, required: {}",
                available, required
            ),
            serde_json::json!({
                "available": available,
                "required": required
            }),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// A rejected query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub value: Option<serde_json::Value>,
}

impl ValidationError {
    pub fn new(field: &str, message: String, value: Option<&str>) -> Self {
        Self {
            field: field.to_string(),
            message,
            value: value.map(|v| serde_json::Value::String(v.to_string())),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let details = serde_json::to_value(&err).unwrap_or(serde_json::Value::Null);
        Self::with_details(400, err.message, details)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        AgentError::from(err).into()
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        let message = err.to_string();
        match err {
            AgentError::Validation { field, reason } => Self::validation_error(&field, &reason),
            AgentError::SourceUnavailable(_) => Self::bad_gateway(&message),
            AgentError::ChainUnavailable { chain_id, .. } => Self::with_details(
                503,
                message,
                serde_json::json!({ "chainId": chain_id }),
            ),
            AgentError::Config(ConfigError::UnknownChain(_))
            | AgentError::Config(ConfigError::MissingAddress { .. }) => Self::bad_request(&message),
            AgentError::ContractCall { .. }
            | AgentError::Encoding { .. }
            | AgentError::Config(_) => Self::internal_server_error(&message),
        }
    }
}
