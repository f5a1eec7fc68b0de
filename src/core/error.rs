use thiserror::Error;

use crate::core::encoder::EncodingError;
use crate::services::StoreError;

/// Errors surfaced by the matching pipeline
///
/// An empty result list is never an error: callers can tell "nothing
/// matched" (`Ok(vec![])`) apart from "the matching engine is down"
/// (`EncoderUnavailable`).
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Matching unavailable: {0}")]
    EncoderUnavailable(#[from] EncodingError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Profile store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid rule pattern: {0}")]
    Rules(#[from] regex::Error),
}
