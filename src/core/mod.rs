// Core algorithm exports
pub mod encoder;
pub mod enhancer;
pub mod error;
pub mod extractor;
pub mod filters;
pub mod matcher;
pub mod ranker;
pub mod rules;
pub mod similarity;

pub use encoder::{build_encoder, Encoder, EncodingError, HashEncoder, UnavailableEncoder};
pub use enhancer::QueryEnhancer;
pub use error::MatchError;
pub use extractor::FilterExtractor;
pub use filters::{apply_filters, matches_filters};
pub use matcher::{profile_query, MatchingPipeline};
pub use ranker::{describe_profile, Ranker};
pub use rules::{RuleChain, RuleChainBuilder};
pub use similarity::{cosine_similarity, match_percentage};
