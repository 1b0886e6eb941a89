use tracing::{debug, info, warn};

use crate::cache::backend::CacheBackend;
use crate::cache::file_store::FileStore;
use crate::cache::secure_store::SecureStore;
use crate::cache::token::CachedToken;
use crate::config::{CacheFallback, CacheMethod, TokenCacheConfig};
use crate::utils::paths::GatewayPaths;

/// Result of [`TokenStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Persisted(&'static str),
    /// Every backend refused the write.
    NotPersisted,
}

/// Durable storage of exactly one cached token over an ordered backend chain.
///
/// Backend failures never escape: they are logged and read as "no token",
/// so an unavailable keychain cannot block obtaining a fresh credential.
#[derive(Debug)]
pub struct TokenStore {
    chain: Vec<CacheBackend>,
    file: FileStore,
}

impl TokenStore {
    pub fn new(config: &TokenCacheConfig, secure: SecureStore, file: FileStore) -> Self {
        let chain = match (config.method, config.fallback) {
            (CacheMethod::Keyring, CacheFallback::File) => vec![
                CacheBackend::SecureStore(secure),
                CacheBackend::File(file.clone()),
            ],
            (CacheMethod::Keyring, CacheFallback::None) => vec![CacheBackend::SecureStore(secure)],
            (CacheMethod::File, _) => vec![CacheBackend::File(file.clone())],
        };
        Self { chain, file }
    }

    /// OS keychain plus `token_cache.json` in the gateway directory.
    pub fn from_config(config: &TokenCacheConfig, paths: &GatewayPaths) -> Self {
        Self::new(
            config,
            SecureStore::keyring(),
            FileStore::new(paths.token_cache_file()),
        )
    }

    pub fn backends(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.chain.iter().map(|b| b.name())
    }

    /// First record found in chain order, valid or not.
    pub async fn peek(&self) -> Option<CachedToken> {
        for backend in &self.chain {
            match backend.get().await {
                Ok(Some(token)) => {
                    debug!("cached token found in '{}' backend", backend.name());
                    return Some(token);
                }
                Ok(None) => debug!("no cached token in '{}' backend", backend.name()),
                Err(err) => debug!("cache backend '{}' read failed: {}", backend.name(), err),
            }
        }
        None
    }

    /// Cached token, only if it is still usable.
    pub async fn get(&self) -> Option<CachedToken> {
        self.peek().await.filter(|token| {
            let valid = token.is_valid();
            if !valid {
                info!("cached token expires at {} and is no longer usable", token.expires_at);
            }
            valid
        })
    }

    /// Writes to the first backend that accepts the record.
    pub async fn save(&self, token: &CachedToken) -> SaveOutcome {
        for backend in &self.chain {
            match backend.set(token).await {
                Ok(()) => {
                    debug!("token cached in '{}' backend", backend.name());
                    return SaveOutcome::Persisted(backend.name());
                }
                Err(err) => warn!("cache backend '{}' write failed: {}", backend.name(), err),
            }
        }
        SaveOutcome::NotPersisted
    }

    /// Best-effort removal from every backend, the cache file included.
    pub async fn clear(&self) {
        for backend in &self.chain {
            if let CacheBackend::File(_) = backend {
                continue;
            }
            match backend.delete().await {
                Ok(removed) => debug!("'{}' backend cleared (removed: {})", backend.name(), removed),
                Err(err) => debug!("cache backend '{}' delete failed: {}", backend.name(), err),
            }
        }
        match self.file.delete().await {
            Ok(removed) => debug!("cache file cleared (removed: {})", removed),
            Err(err) => warn!("cache file {} delete failed: {}", self.file.path().display(), err),
        }
    }
}
