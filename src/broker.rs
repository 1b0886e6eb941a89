//! "Give me a usable token": cache first, otherwise identity → exchange → cache.

use std::io::{self, Write};

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{CachedToken, SaveOutcome, TokenStore};
use crate::config::GatewayConfig;
use crate::error::BrokerError;
use crate::exchange::ExchangeClient;
use crate::helpers::time::{now_f64, seconds_until};
use crate::identity::{AzureAdProvider, IdentityProvider};
use crate::utils::paths::GatewayPaths;

/// Token handed to the caller. Serializes to the CLI contract
/// `{"token": ..., "expires_in": ...}`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    #[serde(rename = "token")]
    pub access_token: String,
    pub expires_in: u64,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Outcome of a check-only lookup. Serializes to `{"valid": bool[, "expires_at": ts]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<f64>,
}

impl CheckReport {
    /// `--check` contract: a valid report goes to `out` with status 0,
    /// anything else to `err` with status 1.
    pub fn write_to(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<u8> {
        let line = serde_json::to_string(self).map_err(io::Error::other)?;
        if self.valid {
            writeln!(out, "{line}")?;
            Ok(0)
        } else {
            writeln!(err, "{line}")?;
            Ok(1)
        }
    }
}

pub struct TokenBroker<P> {
    store: TokenStore,
    exchange: ExchangeClient,
    identity: P,
    exchange_url: String,
    scopes: Vec<String>,
}

impl TokenBroker<AzureAdProvider> {
    /// Production wiring: OS keychain + cache file, Azure AD with the
    /// session cache in the gateway directory, one shared HTTP client.
    pub fn from_config(config: &GatewayConfig, paths: &GatewayPaths) -> Result<Self, reqwest::Error> {
        let client = ExchangeClient::build_http_client()?;
        let identity = AzureAdProvider::new(
            config.azure_ad.clone(),
            client.clone(),
            paths.session_cache_file(),
        );
        Ok(Self::new(
            config,
            TokenStore::from_config(&config.token_cache, paths),
            ExchangeClient::new(client),
            identity,
        ))
    }
}

impl<P: IdentityProvider> TokenBroker<P> {
    pub fn new(config: &GatewayConfig, store: TokenStore, exchange: ExchangeClient, identity: P) -> Self {
        Self {
            store,
            exchange,
            identity,
            exchange_url: config.token_exchange_url(),
            scopes: config.azure_ad.scopes.clone(),
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub async fn get_token(&self) -> Result<IssuedToken, BrokerError> {
        if let Some(cached) = self.store.get().await {
            info!("using cached token");
            return Ok(IssuedToken {
                expires_in: seconds_until(cached.expires_at, now_f64()),
                access_token: cached.access_token,
            });
        }

        info!("no usable cached token, acquiring identity assertion");
        let assertion = self.identity.acquire(&self.scopes).await?;
        let fresh = self.exchange.exchange(&self.exchange_url, &assertion).await?;

        let cached = CachedToken::new(
            fresh.access_token.clone(),
            now_f64() + fresh.expires_in as f64,
            fresh.token_type.clone(),
        );
        match self.store.save(&cached).await {
            SaveOutcome::Persisted(backend) => info!("token cached in '{}' backend", backend),
            SaveOutcome::NotPersisted => {
                warn!("token could not be cached in any backend; the next run will authenticate again")
            }
        }

        Ok(IssuedToken {
            access_token: fresh.access_token,
            expires_in: fresh.expires_in,
        })
    }

    /// Cache lookup only. Never authenticates.
    pub async fn check(&self) -> CheckReport {
        match self.store.get().await {
            Some(cached) => CheckReport {
                valid: true,
                expires_at: Some(cached.expires_at),
            },
            None => CheckReport {
                valid: false,
                expires_at: None,
            },
        }
    }

    pub async fn clear(&self) {
        self.store.clear().await;
    }
}
