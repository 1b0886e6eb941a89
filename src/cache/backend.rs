use crate::cache::file_store::FileStore;
use crate::cache::secure_store::SecureStore;
use crate::cache::token::CachedToken;
use crate::error::CacheBackendError;

static SECURE_STORE_MSG: &str = "keyring";
static FILE_MSG: &str = "file";

/// Closed set of places a cached token can live.
#[derive(Debug)]
pub enum CacheBackend {
    SecureStore(SecureStore),
    File(FileStore),
}

impl CacheBackend {
    pub fn name(&self) -> &'static str {
        match self {
            CacheBackend::SecureStore(_) => SECURE_STORE_MSG,
            CacheBackend::File(_) => FILE_MSG,
        }
    }

    pub async fn get(&self) -> Result<Option<CachedToken>, CacheBackendError> {
        match self {
            CacheBackend::SecureStore(s) => s.get(),
            CacheBackend::File(f) => f.get().await,
        }
    }

    pub async fn set(&self, token: &CachedToken) -> Result<(), CacheBackendError> {
        match self {
            CacheBackend::SecureStore(s) => s.set(token),
            CacheBackend::File(f) => f.set(token).await,
        }
    }

    pub async fn delete(&self) -> Result<bool, CacheBackendError> {
        match self {
            CacheBackend::SecureStore(s) => s.delete(),
            CacheBackend::File(f) => f.delete().await,
        }
    }
}
