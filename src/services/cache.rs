use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::EmbeddingVector;

/// In-process cache of profile embeddings
///
/// Entries are keyed by encoder name plus the exact descriptive text, so an
/// edited profile simply misses and is re-encoded. Embeddings are never
/// persisted; the cache starts empty on every boot.
#[derive(Clone)]
pub struct EmbeddingCache {
    l1_cache: moka::future::Cache<String, Arc<EmbeddingVector>>,
}

impl EmbeddingCache {
    /// Create a new cache holding at most `capacity` vectors
    pub fn new(capacity: u64, ttl_secs: Option<u64>) -> Self {
        let mut builder = moka::future::CacheBuilder::new(capacity);
        if let Some(ttl) = ttl_secs {
            builder = builder.time_to_live(Duration::from_secs(ttl));
        }

        Self {
            l1_cache: builder.build(),
        }
    }

    pub async fn get(&self, encoder: &str, text: &str) -> Option<Arc<EmbeddingVector>> {
        let key = CacheKey::embedding(encoder, text);
        let hit = self.l1_cache.get(&key).await;
        if hit.is_some() {
            tracing::trace!("Embedding cache hit: {}", key);
        }
        hit
    }

    pub async fn insert(&self, encoder: &str, text: &str, vector: Arc<EmbeddingVector>) {
        self.l1_cache
            .insert(CacheKey::embedding(encoder, text), vector)
            .await;
    }

    /// Drop every cached vector
    pub fn invalidate_all(&self) {
        self.l1_cache.invalidate_all();
        tracing::debug!("Invalidated embedding cache");
    }

    /// Get cache statistics
    ///
    /// Flushes moka's pending maintenance first so the counts include
    /// recent inserts.
    pub async fn stats(&self) -> CacheStats {
        self.l1_cache.run_pending_tasks().await;
        CacheStats {
            entries: self.l1_cache.entry_count(),
            weighted_size: self.l1_cache.weighted_size(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub weighted_size: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a text embedding
    pub fn embedding(encoder: &str, text: &str) -> String {
        format!("emb:{}:{}", encoder, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_insert_get() {
        let cache = EmbeddingCache::new(100, None);
        let vector = Arc::new(vec![0.1, 0.2, 0.3]);

        cache.insert("hash", "Sam (30)", Arc::clone(&vector)).await;

        assert_eq!(cache.get("hash", "Sam (30)").await, Some(vector));
        assert!(cache.get("hash", "Sam (31)").await.is_none());
        assert!(cache.get("other", "Sam (30)").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = EmbeddingCache::new(100, None);
        cache.insert("hash", "text", Arc::new(vec![1.0])).await;

        cache.invalidate_all();

        assert!(cache.get("hash", "text").await.is_none());
    }

    #[tokio::test]
    async fn test_stats_track_entries() {
        let cache = EmbeddingCache::new(100, None);
        cache.insert("hash", "a", Arc::new(vec![1.0])).await;
        cache.insert("hash", "b", Arc::new(vec![2.0])).await;

        assert_eq!(cache.stats().await.entries, 2);
    }

    #[test]
    fn test_ttl_cache_serves_fresh_entries() {
        let cache = EmbeddingCache::new(10, Some(3600));

        tokio_test::block_on(async {
            cache.insert("hash", "text", Arc::new(vec![0.5])).await;
            assert_eq!(cache.get("hash", "text").await, Some(Arc::new(vec![0.5])));
        });
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::embedding("hash", "Sam (30)"), "emb:hash:Sam (30)");
    }
}
