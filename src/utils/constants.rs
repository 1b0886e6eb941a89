//! Shared constants and invariants

/// Cached credentials are treated as expired this many seconds before the
/// server-asserted expiry.
pub const EXPIRY_BUFFER_SECONDS: f64 = 300.0;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

// Per-user state directory and its files
pub const GATEWAY_DIR_NAME: &str = ".databricks-claude-gateway";
pub const GATEWAY_HOME_ENV: &str = "GATEWAY_HOME";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const TOKEN_CACHE_FILE_NAME: &str = "token_cache.json";
pub const SESSION_CACHE_FILE_NAME: &str = "msal_cache.bin";

// Secure store slot
pub const KEYRING_SERVICE: &str = "databricks-claude-gateway";
pub const KEYRING_KEY: &str = "databricks_token";

// RFC 8693 token exchange
pub const GRANT_TYPE_TOKEN_EXCHANGE: &str = "urn:ietf:params:oauth:grant-type:token-exchange";
pub const SUBJECT_TOKEN_TYPE_JWT: &str = "urn:ietf:params:oauth:token-type:jwt";
pub const EXCHANGE_SCOPE: &str = "all-apis";

// Azure AD
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
/// Always requested alongside the configured scopes; without `openid` no ID
/// token is issued and without `offline_access` no refresh token.
pub const RESERVED_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];
