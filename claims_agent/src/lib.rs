//! Claims Agent
//!
//! HTTP tool API that lets a conversational agent inspect and act on merkle
//! token claims: per-claimant vesting summaries cross-referenced with on-chain
//! claimed status, balance reads, and unsigned transaction payloads for the
//! claim, swap and delegation actions.

pub mod api;
pub mod chain;
pub mod claims;
pub mod config;
pub mod error;

pub use error::{AgentError, Result};
