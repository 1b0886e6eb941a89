//! Error taxonomy.
//!
//! Config, exchange and identity failures are fatal and carry upstream text
//! verbatim. Cache backend failures never leave the `cache` module.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No config.json found in current directory or {}", .0.display())]
    NoConfigFound(PathBuf),

    #[error("Cannot determine the home directory; set GATEWAY_HOME or pass --config")]
    NoHomeDir,

    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config format: {0}")]
    Parse(String),

    #[error("Missing required config field: {0}")]
    MissingField(&'static str),

    #[error("Missing required azure_ad field: {0}")]
    MissingAzureAdField(&'static str),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CacheBackendError {
    #[error("secure store unavailable: {0}")]
    Unavailable(String),

    #[error("cache file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Token exchange failed (HTTP {}): {body}", .status.as_u16())]
    Rejected { status: StatusCode, body: String },

    #[error("Token exchange returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token exchange request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Azure AD authentication failed: {0}")]
    Provider(String),

    #[error("Azure AD authentication failed: state mismatch in redirect")]
    StateMismatch,

    #[error("Azure AD redirect listener failed: {0}")]
    Callback(String),

    #[error("Azure AD request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid authority url: {0}")]
    Authority(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}
