use std::sync::Arc;

use crate::core::{
    encoder::Encoder,
    enhancer::QueryEnhancer,
    error::MatchError,
    extractor::FilterExtractor,
    filters::apply_filters,
    ranker::Ranker,
};
use crate::models::{Profile, RelationshipType, ScoredCandidate};
use crate::services::{CacheStats, EmbeddingCache, ProfileStore};

/// Main matching orchestrator - natural-language query to ranked profiles
///
/// # Pipeline Stages
/// 1. Query enhancement (vocabulary expansion)
/// 2. Filter extraction from the raw query
/// 3. Structured filtering of the store's profiles
/// 4. Embedding, similarity scoring and ranking
///
/// Built once at startup and shared behind an `Arc`; holds no per-request
/// state, so concurrent searches are independent.
pub struct MatchingPipeline {
    enhancer: QueryEnhancer,
    extractor: FilterExtractor,
    ranker: Ranker,
    store: Arc<dyn ProfileStore>,
}

impl MatchingPipeline {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        encoder: Arc<dyn Encoder>,
        cache: Option<EmbeddingCache>,
    ) -> Result<Self, MatchError> {
        Ok(Self {
            enhancer: QueryEnhancer::new()?,
            extractor: FilterExtractor::new()?,
            ranker: Ranker::new(encoder, cache),
            store,
        })
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    pub fn encoder(&self) -> &Arc<dyn Encoder> {
        self.ranker.encoder()
    }

    /// Whether the encoder loaded; `false` means every search will fail
    /// with `EncoderUnavailable`
    pub fn encoder_available(&self) -> bool {
        self.ranker.encoder().is_available()
    }

    /// Cached profile embeddings; `None` when the cache is disabled
    pub async fn embedding_cache_stats(&self) -> Option<CacheStats> {
        match self.ranker.cache() {
            Some(cache) => Some(cache.stats().await),
            None => None,
        }
    }

    /// Drop cached profile embeddings (after the profile set changed)
    pub fn invalidate_embeddings(&self) {
        if let Some(cache) = self.ranker.cache() {
            cache.invalidate_all();
        }
    }

    /// Search profiles with a natural-language query
    ///
    /// # Arguments
    /// * `raw_query` - The user's free-text query
    /// * `requesting_user_id` - Excluded from the candidates when present
    /// * `top_k` - Maximum number of results, must be positive
    ///
    /// # Returns
    /// Candidates sorted by descending similarity, at most `top_k` of them
    pub async fn search(
        &self,
        raw_query: &str,
        requesting_user_id: Option<&str>,
        top_k: i64,
    ) -> Result<Vec<ScoredCandidate>, MatchError> {
        if raw_query.trim().is_empty() {
            return Err(MatchError::InvalidInput("query must not be empty".to_string()));
        }
        let top_k = usize::try_from(top_k)
            .ok()
            .filter(|k| *k > 0)
            .ok_or_else(|| {
                MatchError::InvalidInput(format!("top_k must be positive, got {}", top_k))
            })?;

        let enhanced = self.enhancer.enhance(raw_query);
        // Filters read the user's own wording, not the expansion
        let filters = self.extractor.extract(raw_query);

        let snapshot = self.store.list_all().await?;
        let total_candidates = snapshot.len();

        let candidates: Vec<Profile> = snapshot
            .iter()
            .filter(|profile| Some(profile.id.as_str()) != requesting_user_id)
            .cloned()
            .collect();

        let filtered = apply_filters(candidates, &filters);
        let results = self.ranker.rank(&enhanced, filtered, top_k).await?;

        tracing::info!(
            "Returning {} matches (from {} profiles)",
            results.len(),
            total_candidates
        );

        Ok(results)
    }

    /// Find matches for an existing user from their own profile
    ///
    /// Builds a query from the user's relationship type and top interests,
    /// then runs [`MatchingPipeline::search`] with the user excluded.
    pub async fn match_for_user(
        &self,
        user_id: &str,
        top_k: i64,
    ) -> Result<Vec<ScoredCandidate>, MatchError> {
        let profile = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("user {}", user_id)))?;

        let query = profile_query(&profile);
        tracing::info!("Matching user {} with query '{}'", user_id, query);

        self.search(&query, Some(user_id), top_k).await
    }
}

/// Synthetic query describing what a user is looking for
pub fn profile_query(profile: &Profile) -> String {
    let interests = profile.top_interests(3).join(", ");
    match profile.relationship_type {
        RelationshipType::Unspecified => {
            format!("Looking for a relationship with someone who likes {}", interests)
        }
        tag => format!(
            "Looking for {} relationship with someone who likes {}",
            tag, interests
        ),
    }
}
