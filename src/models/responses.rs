use serde::{Deserialize, Serialize};
use crate::models::domain::{RelationshipType, ScoredCandidate};

/// A single ranked match as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub location: String,
    pub profession: String,
    pub interests: Vec<String>,
    pub bio: String,
    pub relationship_type: RelationshipType,
    pub similarity_score: f32,
    pub match_percentage: u8,
}

impl From<ScoredCandidate> for MatchResult {
    fn from(scored: ScoredCandidate) -> Self {
        let profile = scored.profile;
        Self {
            id: profile.id,
            name: profile.name,
            age: profile.age,
            location: profile.location,
            profession: profile.profession,
            interests: profile.interests,
            bio: profile.bio,
            relationship_type: profile.relationship_type,
            similarity_score: scored.similarity,
            match_percentage: scored.match_percentage,
        }
    }
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub total_results: usize,
    pub results: Vec<MatchResult>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub encoder: String,
    pub profiles: usize,
    /// Profile embeddings currently cached (0 when the cache is disabled)
    pub embeddings_cached: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Reload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub profiles: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
