use std::path::{Path, PathBuf};

use crate::cache::token::CachedToken;
use crate::error::CacheBackendError;
use crate::utils::atomic_file::{read_if_exists, remove_if_exists, write_private};

/// File backend: one JSON record, replaced atomically, readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Result<Option<CachedToken>, CacheBackendError> {
        match read_if_exists(&self.path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, token: &CachedToken) -> Result<(), CacheBackendError> {
        let bytes = serde_json::to_vec(token)?;
        write_private(&self.path, &bytes).await?;
        Ok(())
    }

    pub async fn delete(&self) -> Result<bool, CacheBackendError> {
        Ok(remove_if_exists(&self.path).await?)
    }
}
