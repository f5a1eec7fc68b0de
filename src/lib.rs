//! Lume Semantic - Natural-language profile search for Lume dating app
//!
//! This library provides the semantic matching pipeline: a free-text query
//! is expanded, mined for structured filters, and compared against profile
//! descriptions in embedding space to produce a ranked list of matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchError, MatchingPipeline, cosine_similarity, match_percentage};
pub use models::{FilterSet, Profile, RelationshipType, ScoredCandidate, SearchRequest, SearchResponse};
