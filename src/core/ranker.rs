use std::sync::Arc;

use crate::core::encoder::{Encoder, EncodingError};
use crate::core::error::MatchError;
use crate::core::similarity::{cosine_similarity, match_percentage};
use crate::models::{EmbeddingVector, Profile, ScoredCandidate};
use crate::services::EmbeddingCache;

/// Number of interests included in a profile's descriptive text
pub const DESCRIPTION_INTERESTS: usize = 3;

/// Bio characters kept before the text is cut with `...`
pub const DESCRIPTION_BIO_CHARS: usize = 100;

/// Text a profile is embedded as
///
/// Format (fixed so scores are reproducible):
/// `"{name} ({age}), {profession} in {location}. Interests: {i1, i2, i3}. {bio}"`
/// where only the first three interests are listed and the bio is cut to
/// 100 characters, followed by `...` when it was longer.
pub fn describe_profile(profile: &Profile) -> String {
    let interests = profile.top_interests(DESCRIPTION_INTERESTS).join(", ");

    let mut bio: String = profile.bio.chars().take(DESCRIPTION_BIO_CHARS).collect();
    if profile.bio.chars().count() > DESCRIPTION_BIO_CHARS {
        bio.push_str("...");
    }

    format!(
        "{} ({}), {} in {}. Interests: {}. {}",
        profile.name, profile.age, profile.profession, profile.location, interests, bio
    )
}

/// Embedding-based ranker
///
/// Encodes the query and candidate descriptions, scores by cosine
/// similarity, and keeps the `top_k` best. Encoder calls run on the
/// blocking thread pool.
#[derive(Clone)]
pub struct Ranker {
    encoder: Arc<dyn Encoder>,
    cache: Option<EmbeddingCache>,
}

impl Ranker {
    pub fn new(encoder: Arc<dyn Encoder>, cache: Option<EmbeddingCache>) -> Self {
        Self { encoder, cache }
    }

    pub fn encoder(&self) -> &Arc<dyn Encoder> {
        &self.encoder
    }

    pub fn cache(&self) -> Option<&EmbeddingCache> {
        self.cache.as_ref()
    }

    /// Rank candidates against `query_text`
    ///
    /// Results are sorted by descending similarity; equal scores keep their
    /// input order. At most `top_k` entries are returned.
    pub async fn rank(
        &self,
        query_text: &str,
        candidates: Vec<Profile>,
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate>, MatchError> {
        if top_k == 0 {
            return Err(MatchError::InvalidInput("top_k must be positive".to_string()));
        }

        // The query goes first so an unavailable encoder surfaces even when
        // there is nothing to rank.
        let query_vector = self
            .encode(vec![query_text.to_string()])
            .await?
            .pop()
            .ok_or(EncodingError::CountMismatch { expected: 1, got: 0 })?;

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let descriptions: Vec<String> = candidates.iter().map(describe_profile).collect();
        let candidate_vectors = self.candidate_vectors(&descriptions).await?;

        let mut scored: Vec<(Profile, f32)> = candidates
            .into_iter()
            .zip(candidate_vectors.iter())
            .map(|(profile, vector)| {
                let similarity = cosine_similarity(&query_vector, vector);
                (profile, similarity)
            })
            .collect();

        // sort_by is stable: ties keep candidate order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(profile, similarity)| ScoredCandidate {
                profile,
                similarity,
                match_percentage: match_percentage(similarity),
            })
            .collect())
    }

    /// Candidate vectors in description order, served from the cache when
    /// possible. Misses are encoded in a single batch.
    async fn candidate_vectors(
        &self,
        descriptions: &[String],
    ) -> Result<Vec<Arc<EmbeddingVector>>, EncodingError> {
        let Some(cache) = &self.cache else {
            let vectors = self.encode(descriptions.to_vec()).await?;
            return Ok(vectors.into_iter().map(Arc::new).collect());
        };

        let encoder_name = self.encoder.name();
        let mut slots: Vec<Option<Arc<EmbeddingVector>>> = Vec::with_capacity(descriptions.len());
        let mut misses = Vec::new();

        for (i, text) in descriptions.iter().enumerate() {
            let hit = cache.get(encoder_name, text).await;
            if hit.is_none() {
                misses.push(i);
            }
            slots.push(hit);
        }

        tracing::debug!(
            "Embedding cache: {} hits, {} misses",
            descriptions.len() - misses.len(),
            misses.len()
        );

        if !misses.is_empty() {
            let batch: Vec<String> = misses.iter().map(|&i| descriptions[i].clone()).collect();
            let fresh = self.encode(batch).await?;

            for (i, vector) in misses.into_iter().zip(fresh) {
                let vector = Arc::new(vector);
                cache.insert(encoder_name, &descriptions[i], Arc::clone(&vector)).await;
                slots[i] = Some(vector);
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Run the encoder on the blocking pool and check the output count
    async fn encode(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>, EncodingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected = texts.len();
        let encoder = Arc::clone(&self.encoder);
        let vectors = tokio::task::spawn_blocking(move || encoder.embed(&texts))
            .await
            .map_err(|e| EncodingError::Inference(format!("encoder worker failed: {}", e)))??;

        if vectors.len() != expected {
            return Err(EncodingError::CountMismatch {
                expected,
                got: vectors.len(),
            });
        }
        Ok(vectors)
    }
}
