//! Tool route handlers. Every tool is a `GET` with query parameters.

pub mod actions;
pub mod balance;
pub mod claim;
pub mod staking;
pub mod summary;

use crate::api::errors::ApiResult;
use axum::Json;
use log::error;

/// Wrap a tool result, logging failures under the tool's name.
pub(crate) fn respond<T>(tool: &str, result: ApiResult<T>) -> ApiResult<Json<T>> {
    result.map(Json).map_err(|e| {
        error!("[{} Error] {}", tool, e);
        e
    })
}
