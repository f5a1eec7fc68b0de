use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Relationship type a profile is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Serious,
    Casual,
    /// Any tag outside the known set
    #[default]
    #[serde(other)]
    Unspecified,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Serious => "serious",
            RelationshipType::Casual => "casual",
            RelationshipType::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dating profile as served by the profile store
///
/// Profiles are loaded once at startup (or on an explicit reload) and are
/// never mutated by the matching pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub location: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub preferences: HashMap<String, serde_json::Value>,
}

impl Profile {
    /// First `n` interests in profile order
    pub fn top_interests(&self, n: usize) -> &[String] {
        &self.interests[..self.interests.len().min(n)]
    }
}

/// Structured constraints extracted from a natural-language query
///
/// Every field is optional; an absent field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
}

impl FilterSet {
    /// Set an age range, swapping the bounds if they arrive reversed
    pub fn with_age_range(mut self, a: u32, b: u32) -> Self {
        self.age_min = Some(a.min(b));
        self.age_max = Some(a.max(b));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.age_min.is_none()
            && self.age_max.is_none()
            && self.location.is_none()
            && self.relationship_type.is_none()
    }
}

/// Fixed-length embedding produced by an encoder
pub type EmbeddingVector = Vec<f32>;

/// Ranked candidate with its raw similarity and derived match percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub profile: Profile,
    /// Cosine similarity in [-1, 1]
    pub similarity: f32,
    /// Similarity clamped to [0, 1] and scaled to [0, 100]
    pub match_percentage: u8,
}
