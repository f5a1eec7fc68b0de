//! Text encoders
//!
//! An [`Encoder`] turns texts into fixed-dimension vectors. Encoding is
//! synchronous and CPU-bound; async callers run it on the blocking pool
//! (see [`crate::core::ranker::Ranker`]).

use std::sync::Arc;
use thiserror::Error;

use crate::config::EncoderSettings;
use crate::models::EmbeddingVector;

/// Default dimension, matching all-MiniLM-L6-v2
pub const DEFAULT_DIMENSION: usize = 384;

/// Default sentence-embedding model
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Errors raised while encoding text
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("encoder not loaded: {0}")]
    Unavailable(String),

    #[error("encoding failed: {0}")]
    Inference(String),

    #[error("encoder returned {got} vectors for {expected} texts")]
    CountMismatch { expected: usize, got: usize },
}

/// Sentence encoder shared read-only across requests
pub trait Encoder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// One vector per input text, in input order. Empty input yields an
    /// empty output.
    fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EncodingError>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Feature-hashing bag-of-words encoder
///
/// Each lower-cased alphanumeric token is hashed with FNV-1a into one of
/// `dimension` buckets; the bucket counts are L2-normalized. Deterministic
/// and model-free, which makes scores reproducible across machines.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dimension: usize,
}

impl HashEncoder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Encoder for HashEncoder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EncodingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[inline]
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Stand-in used when the configured model failed to load
///
/// Every call fails with [`EncodingError::Unavailable`] so the service keeps
/// running and reports "matching unavailable" instead of crashing.
#[derive(Debug, Clone)]
pub struct UnavailableEncoder {
    reason: String,
}

impl UnavailableEncoder {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Encoder for UnavailableEncoder {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn dimension(&self) -> usize {
        0
    }

    fn embed(&self, _texts: &[String]) -> Result<Vec<EmbeddingVector>, EncodingError> {
        Err(EncodingError::Unavailable(self.reason.clone()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(feature = "fastembed")]
pub use self::onnx::FastEmbedEncoder;

#[cfg(feature = "fastembed")]
mod onnx {
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{EmbeddingVector, Encoder, EncodingError, DEFAULT_DIMENSION};

    /// all-MiniLM-L6-v2 through ONNX Runtime
    pub struct FastEmbedEncoder {
        model: TextEmbedding,
        name: String,
    }

    impl FastEmbedEncoder {
        /// Load (downloading on first use) the named model
        pub fn load(model_name: &str) -> Result<Self, EncodingError> {
            let model = match model_name {
                "sentence-transformers/all-MiniLM-L6-v2" | "all-MiniLM-L6-v2" => {
                    EmbeddingModel::AllMiniLML6V2
                }
                other => {
                    return Err(EncodingError::Unavailable(format!(
                        "unsupported embedding model: {}",
                        other
                    )))
                }
            };

            let model = TextEmbedding::try_new(
                InitOptions::new(model).with_show_download_progress(false),
            )
            .map_err(|e| EncodingError::Unavailable(e.to_string()))?;

            Ok(Self {
                model,
                name: model_name.to_string(),
            })
        }
    }

    impl Encoder for FastEmbedEncoder {
        fn name(&self) -> &str {
            &self.name
        }

        fn dimension(&self) -> usize {
            DEFAULT_DIMENSION
        }

        fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EncodingError> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            self.model
                .embed(texts.to_vec(), None)
                .map_err(|e| EncodingError::Inference(e.to_string()))
        }
    }
}

/// Build the configured encoder, degrading instead of failing
///
/// Called once at startup. A load failure is logged and replaced by an
/// [`UnavailableEncoder`].
pub fn build_encoder(settings: &EncoderSettings) -> Arc<dyn Encoder> {
    match load_encoder(settings) {
        Ok(encoder) => {
            tracing::info!(
                "Encoder '{}' ready (dimension {})",
                encoder.name(),
                encoder.dimension()
            );
            encoder
        }
        Err(e) => {
            tracing::error!("Failed to load encoder, matching unavailable: {}", e);
            Arc::new(UnavailableEncoder::new(e.to_string()))
        }
    }
}

fn load_encoder(settings: &EncoderSettings) -> Result<Arc<dyn Encoder>, EncodingError> {
    match settings.backend.as_str() {
        "hash" => Ok(Arc::new(HashEncoder::new(settings.dimension))),
        #[cfg(feature = "fastembed")]
        "fastembed" => Ok(Arc::new(FastEmbedEncoder::load(&settings.model_name)?)),
        #[cfg(not(feature = "fastembed"))]
        "fastembed" => Err(EncodingError::Unavailable(
            "built without the `fastembed` feature".to_string(),
        )),
        other => Err(EncodingError::Unavailable(format!(
            "unknown encoder backend: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_encoder_preserves_order_and_count() {
        let encoder = HashEncoder::default();
        let texts = vec!["hiking".to_string(), "opera".to_string(), "hiking".to_string()];

        let vectors = encoder.embed(&texts).unwrap();

        assert_eq!(vectors.len(), 3);
        assert!(vectors.iter().all(|v| v.len() == DEFAULT_DIMENSION));
        assert_eq!(vectors[0], vectors[2]);
        assert_ne!(vectors[0], vectors[1]);
    }

    #[test]
    fn test_hash_encoder_empty_input() {
        let encoder = HashEncoder::default();
        assert!(encoder.embed(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_hash_encoder_normalizes() {
        let encoder = HashEncoder::new(64);
        let vectors = encoder.embed(&["Software Engineer, loves hiking".to_string()]).unwrap();
        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hash_encoder_blank_text_is_zero_vector() {
        let encoder = HashEncoder::new(16);
        let vectors = encoder.embed(&["  ,. ".to_string()]).unwrap();
        assert!(vectors[0].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_hash_encoder_is_case_insensitive() {
        let encoder = HashEncoder::default();
        let vectors = encoder
            .embed(&["Austin Texas".to_string(), "austin texas".to_string()])
            .unwrap();
        assert_eq!(vectors[0], vectors[1]);
    }

    #[test]
    fn test_unavailable_encoder_always_fails() {
        let encoder = UnavailableEncoder::new("model missing");
        assert!(!encoder.is_available());
        assert!(matches!(
            encoder.embed(&["x".to_string()]),
            Err(EncodingError::Unavailable(_))
        ));
    }

    #[test]
    fn test_unknown_backend_degrades() {
        let settings = EncoderSettings {
            backend: "word2vec".to_string(),
            ..EncoderSettings::default()
        };
        let encoder = build_encoder(&settings);
        assert!(!encoder.is_available());
    }
}
