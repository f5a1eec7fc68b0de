use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::Profile;

/// Errors that can occur when loading profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read profiles file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profiles file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate profile id: {0}")]
    DuplicateId(String),

    #[error("Store has no backing file to reload from")]
    NotReloadable,
}

/// Read-only source of candidate profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Every profile, in store order
    async fn list_all(&self) -> Result<Arc<Vec<Profile>>, StoreError>;

    /// Point lookup by id
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError>;
}

/// Profile store backed by a JSON array on disk
///
/// The profile list is an immutable snapshot behind a reader-writer lock:
/// readers clone the `Arc`, and [`JsonProfileStore::reload`] swaps in a
/// fully parsed replacement, so a ranking pass never sees a half-loaded list.
pub struct JsonProfileStore {
    path: Option<PathBuf>,
    profiles: RwLock<Arc<Vec<Profile>>>,
}

impl JsonProfileStore {
    /// Load profiles from a JSON file
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let profiles = read_profiles(&path).await?;

        tracing::info!("Loaded {} profiles from {}", profiles.len(), path.display());

        Ok(Self {
            path: Some(path),
            profiles: RwLock::new(Arc::new(profiles)),
        })
    }

    /// Build a store from profiles already in memory
    pub fn from_profiles(profiles: Vec<Profile>) -> Result<Self, StoreError> {
        check_unique_ids(&profiles)?;
        Ok(Self {
            path: None,
            profiles: RwLock::new(Arc::new(profiles)),
        })
    }

    /// Re-read the backing file and atomically replace the snapshot
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> Result<usize, StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::NotReloadable)?;
        let profiles = read_profiles(path).await?;
        let count = profiles.len();

        *self.profiles.write().await = Arc::new(profiles);

        tracing::info!("Reloaded {} profiles from {}", count, path.display());
        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProfileStore for JsonProfileStore {
    async fn list_all(&self) -> Result<Arc<Vec<Profile>>, StoreError> {
        Ok(Arc::clone(&*self.profiles.read().await))
    }

    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }
}

async fn read_profiles(path: &Path) -> Result<Vec<Profile>, StoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let profiles: Vec<Profile> = serde_json::from_slice(&bytes)?;
    check_unique_ids(&profiles)?;
    Ok(profiles)
}

fn check_unique_ids(profiles: &[Profile]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(profiles.len());
    for profile in profiles {
        if !seen.insert(profile.id.as_str()) {
            return Err(StoreError::DuplicateId(profile.id.clone()));
        }
    }
    Ok(())
}
