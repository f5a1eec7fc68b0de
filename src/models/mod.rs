// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{EmbeddingVector, FilterSet, Profile, RelationshipType, ScoredCandidate};
pub use requests::{MatchQuery, SearchRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchResult, ReloadResponse, SearchResponse};
