//! RFC 8693 token exchange against the workspace OIDC endpoint.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ExchangeError;
use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TOKEN_TYPE, EXCHANGE_SCOPE, GRANT_TYPE_TOKEN_EXCHANGE,
    SUBJECT_TOKEN_TYPE_JWT,
};

/// Token issued by the exchange endpoint.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangedToken {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl fmt::Debug for ExchangedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangedToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

#[derive(Debug, Clone)]
pub struct ExchangeClient {
    client: Client,
}

impl ExchangeClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client with the default 30s request timeout. There is no retry, so
    /// a hung endpoint must not hang the caller.
    pub fn build_http_client() -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()
    }

    /// Exchanges an identity-provider JWT for a workspace access token.
    pub async fn exchange(&self, url: &str, assertion: &str) -> Result<ExchangedToken, ExchangeError> {
        let form = [
            ("grant_type", GRANT_TYPE_TOKEN_EXCHANGE),
            ("subject_token", assertion),
            ("subject_token_type", SUBJECT_TOKEN_TYPE_JWT),
            ("scope", EXCHANGE_SCOPE),
        ];

        debug!("exchanging identity assertion at {}", url);
        let response = self.client.post(url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ExchangeError::Rejected { status, body });
        }

        let token: ExchangedToken = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;
        info!("token exchange succeeded, expires in {}s", token.expires_in);
        Ok(token)
    }
}
