// Service exports
pub mod cache;
pub mod store;

pub use cache::{CacheKey, CacheStats, EmbeddingCache};
pub use store::{JsonProfileStore, ProfileStore, StoreError};
