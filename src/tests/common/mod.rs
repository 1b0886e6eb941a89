// tests/common/mod.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
pub use serde_json::json;

use crate::cache::file_store::FileStore;
use crate::cache::secure_store::{SecretSlot, SecureStore};
use crate::cache::CachedToken;
use crate::config::{AzureAdConfig, GatewayConfig, TokenCacheConfig};
use crate::error::{CacheBackendError, IdentityError};
use crate::helpers::time::now_f64;
use crate::identity::IdentityProvider;

pub fn sample_config_json() -> serde_json::Value {
    json!({
        "databricks_host": "https://e2-dogfood.staging.cloud.databricks.com",
        "endpoint_name": "claude-code-gateway",
        "model": "claude-sonnet-4-20250514",
        "azure_ad": {
            "tenant_id": "test-tenant-id",
            "client_id": "test-client-id",
            "scopes": ["openid", "profile", "email"]
        },
        "token_cache": {"method": "keyring", "fallback": "file"}
    })
}

/// Config pointing both the workspace and the authority at `base_url`.
pub fn config_for(base_url: &str, token_cache: TokenCacheConfig) -> GatewayConfig {
    let mut azure_ad = AzureAdConfig::new("test-tenant", "test-client");
    azure_ad.authority = base_url.to_string();
    GatewayConfig {
        databricks_host: format!("{}/", base_url),
        endpoint_name: "ep".to_string(),
        model: "m".to_string(),
        azure_ad,
        token_cache,
        logging: None,
    }
}

pub fn token_expiring_in(access_token: &str, seconds: f64) -> CachedToken {
    CachedToken::new(access_token.to_string(), now_f64() + seconds, "Bearer".to_string())
}

pub fn file_store_in(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path().join("token_cache.json"))
}

/// Unsigned JWT with the given `exp` and `preferred_username` claims.
pub fn fake_id_token(exp: i64, username: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({"exp": exp, "preferred_username": username, "oid": "oid-1"})
            .to_string()
            .as_bytes(),
    );
    format!("{header}.{payload}.sig")
}

/// In-memory secret slot.
#[derive(Clone, Default)]
pub struct MemorySlot {
    pub secret: Arc<Mutex<Option<String>>>,
}

impl SecretSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, CacheBackendError> {
        Ok(self.secret.lock().unwrap().clone())
    }

    fn write(&self, secret: &str) -> Result<(), CacheBackendError> {
        *self.secret.lock().unwrap() = Some(secret.to_string());
        Ok(())
    }

    fn erase(&self) -> Result<bool, CacheBackendError> {
        Ok(self.secret.lock().unwrap().take().is_some())
    }
}

/// Secret slot whose backend is always unavailable.
#[derive(Clone, Default)]
pub struct FailingSlot {
    pub calls: Arc<AtomicUsize>,
}

impl SecretSlot for FailingSlot {
    fn read(&self) -> Result<Option<String>, CacheBackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheBackendError::Unavailable("access denied".into()))
    }

    fn write(&self, _secret: &str) -> Result<(), CacheBackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheBackendError::Unavailable("access denied".into()))
    }

    fn erase(&self) -> Result<bool, CacheBackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheBackendError::Unavailable("access denied".into()))
    }
}

pub fn failing_secure_store() -> SecureStore {
    SecureStore::new(FailingSlot::default())
}

/// Identity provider returning a fixed assertion and counting calls.
#[derive(Clone)]
pub struct StaticIdentity {
    pub assertion: Result<String, String>,
    pub calls: Arc<AtomicUsize>,
}

impl StaticIdentity {
    pub fn ok(assertion: &str) -> Self {
        Self {
            assertion: Ok(assertion.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(description: &str) -> Self {
        Self {
            assertion: Err(description.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for StaticIdentity {
    async fn acquire(&self, _scopes: &[String]) -> Result<String, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.assertion.clone().map_err(IdentityError::Provider)
    }
}
