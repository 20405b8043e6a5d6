//! HTTP tool API served to the agent runtime.

pub mod errors;
pub mod handlers;
pub mod indexer;
pub mod openapi;
pub mod router;
pub mod validation;

pub use errors::{ApiError, ApiResult, ValidationError};
pub use indexer::IndexerClient;
pub use router::{create_router, AppState};
