use serde::Deserialize;

use crate::config::settings::LoggingConfig;
use crate::utils::constants::DEFAULT_AUTHORITY;

/// ================================
/// Full gateway configuration
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GatewayConfig {
    pub databricks_host: String,
    pub endpoint_name: String,
    pub model: String,
    pub azure_ad: AzureAdConfig,
    #[serde(default)]
    pub token_cache: TokenCacheConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl GatewayConfig {
    fn host(&self) -> &str {
        self.databricks_host.trim_end_matches('/')
    }

    /// Model serving invocation url handed to the client as its base url.
    pub fn base_url(&self) -> String {
        format!(
            "{}/serving-endpoints/{}/invocations",
            self.host(),
            self.endpoint_name
        )
    }

    /// RFC 8693 token exchange endpoint of the workspace.
    pub fn token_exchange_url(&self) -> String {
        format!("{}/oidc/v1/token", self.host())
    }
}

/// ================================
/// Identity provider
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AzureAdConfig {
    pub tenant_id: String,
    pub client_id: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Login host, overridable for sovereign clouds.
    #[serde(default = "default_authority")]
    pub authority: String,
}

impl AzureAdConfig {
    pub fn new(tenant_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            scopes: default_scopes(),
            authority: default_authority(),
        }
    }

    fn tenant_base(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }

    pub fn authorize_endpoint(&self) -> String {
        format!("{}/authorize", self.tenant_base())
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/token", self.tenant_base())
    }
}

fn default_scopes() -> Vec<String> {
    ["openid", "profile", "email"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}

/// ================================
/// Token cache backends
/// ================================
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCacheConfig {
    #[serde(default)]
    pub method: CacheMethod,
    #[serde(default)]
    pub fallback: CacheFallback,
}

impl TokenCacheConfig {
    pub fn new(method: CacheMethod, fallback: CacheFallback) -> Self {
        Self { method, fallback }
    }
}

/// Primary backend.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheMethod {
    #[default]
    Keyring,
    File,
}

/// Secondary backend, tried after the primary.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheFallback {
    #[default]
    File,
    None,
}
