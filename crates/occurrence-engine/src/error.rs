//! Error types for occurrence-engine operations.

use thiserror::Error;

/// Errors returned by the typed parsing and configuration APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OccurrenceError {
    #[error("Invalid occurrence token: {0}")]
    InvalidToken(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid action: {0} (expected add, remove or vet)")]
    InvalidAction(String),

    #[error("Invalid expansion mode: {0} (expected range or days)")]
    InvalidMode(String),

    #[error("Invalid horizon: {0} days (at most {max})", max = crate::options::MAX_HORIZON_DAYS)]
    InvalidHorizon(u32),
}

pub type Result<T> = std::result::Result<T, OccurrenceError>;
