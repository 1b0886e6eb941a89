use std::path::PathBuf;

use oauth2::{CsrfToken, PkceCodeChallenge};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AzureAdConfig;
use crate::error::IdentityError;
use crate::helpers::time::now_i64;
use crate::identity::id_token;
use crate::identity::loopback::LoopbackRedirect;
use crate::identity::session::{AccountSession, SessionCache};
use crate::identity::{Browser, IdentityProvider, SystemBrowser};
use crate::utils::constants::RESERVED_SCOPES;

/// Token endpoint reply; Azure AD answers errors with the same JSON shape.
#[derive(Debug, Default, Deserialize)]
struct ProviderTokenResponse {
    id_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl ProviderTokenResponse {
    fn describe_error(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Azure AD public client: silent reuse of the stored session first,
/// interactive authorization code + PKCE otherwise.
#[derive(Debug, Clone)]
pub struct AzureAdProvider<B = SystemBrowser> {
    config: AzureAdConfig,
    client: Client,
    session_path: PathBuf,
    browser: B,
}

impl AzureAdProvider<SystemBrowser> {
    pub fn new(config: AzureAdConfig, client: Client, session_path: impl Into<PathBuf>) -> Self {
        Self::with_browser(config, client, session_path, SystemBrowser)
    }
}

impl<B: Browser> AzureAdProvider<B> {
    pub fn with_browser(
        config: AzureAdConfig,
        client: Client,
        session_path: impl Into<PathBuf>,
        browser: B,
    ) -> Self {
        Self {
            config,
            client,
            session_path: session_path.into(),
            browser,
        }
    }

    /// Configured scopes followed by the reserved ones they lack, space separated.
    pub(crate) fn scope_param(scopes: &[String]) -> String {
        let mut requested: Vec<&str> = Vec::with_capacity(scopes.len() + RESERVED_SCOPES.len());
        for scope in scopes.iter().map(String::as_str).chain(RESERVED_SCOPES) {
            if !requested.contains(&scope) {
                requested.push(scope);
            }
        }
        requested.join(" ")
    }

    async fn redeem(&self, form: &[(&str, &str)]) -> Result<ProviderTokenResponse, IdentityError> {
        let response = self
            .client
            .post(self.config.token_endpoint())
            .form(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|_| {
            IdentityError::Provider(format!("unexpected token endpoint response (HTTP {}): {}", status.as_u16(), body))
        })
    }

    fn remember(&self, session: &mut SessionCache, id_token: &str, refresh_token: Option<String>) {
        let username = id_token::claims(id_token).and_then(|c| c.preferred_username);
        session.upsert(AccountSession {
            tenant_id: self.config.tenant_id.clone(),
            client_id: self.config.client_id.clone(),
            username,
            id_token: id_token.to_owned(),
            refresh_token,
        });
    }

    /// Reuses the stored session. `None` means user interaction is required.
    pub async fn acquire_silent(&self, session: &mut SessionCache, scopes: &[String]) -> Option<String> {
        let account = session
            .account(&self.config.tenant_id, &self.config.client_id)?
            .clone();

        if id_token::is_fresh(&account.id_token, now_i64()) {
            debug!("reusing cached id token for {:?}", account.username);
            return Some(account.id_token);
        }

        let refresh_token = account.refresh_token.clone()?;
        let scope = Self::scope_param(scopes);
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("scope", scope.as_str()),
        ];

        match self.redeem(&form).await {
            Ok(ProviderTokenResponse {
                id_token: Some(id_token),
                refresh_token: rotated,
                ..
            }) => {
                info!("silently refreshed id token for {:?}", account.username);
                self.remember(session, &id_token, rotated.or(Some(refresh_token)));
                Some(id_token)
            }
            Ok(response) => {
                warn!("silent authentication failed: {}", response.describe_error());
                if response.error.as_deref() == Some("invalid_grant") {
                    session.remove(&self.config.tenant_id, &self.config.client_id);
                }
                None
            }
            Err(err) => {
                warn!("silent authentication failed: {}", err);
                None
            }
        }
    }

    /// Browser sign-in through a loopback redirect. Waits for the user.
    pub async fn acquire_interactive(
        &self,
        session: &mut SessionCache,
        scopes: &[String],
    ) -> Result<String, IdentityError> {
        let redirect = LoopbackRedirect::bind().await?;
        let redirect_uri = redirect.redirect_uri();
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let state = CsrfToken::new_random();
        let scope = Self::scope_param(scopes);

        let mut authorize_url = Url::parse(&self.config.authorize_endpoint())?;
        authorize_url
            .query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &redirect_uri)
            .append_pair("response_mode", "query")
            .append_pair("scope", &scope)
            .append_pair("state", state.secret())
            .append_pair("code_challenge", challenge.as_str())
            .append_pair("code_challenge_method", "S256")
            .append_pair("prompt", "select_account");

        self.browser.open(authorize_url.as_str());
        let response = redirect.wait().await?;

        if response.error.is_some() {
            let description = response
                .error_description
                .or(response.error)
                .unwrap_or_default();
            return Err(IdentityError::Provider(description));
        }
        if response.state.as_deref() != Some(state.secret().as_str()) {
            return Err(IdentityError::StateMismatch);
        }
        let code = response
            .code
            .ok_or_else(|| IdentityError::Provider("redirect carried no authorization code".into()))?;

        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("code_verifier", verifier.secret().as_str()),
            ("scope", scope.as_str()),
        ];
        let tokens = self.redeem(&form).await?;
        let id_token = match tokens.id_token {
            Some(ref id_token) => id_token.clone(),
            None => return Err(IdentityError::Provider(tokens.describe_error())),
        };

        info!("interactive authentication succeeded");
        self.remember(session, &id_token, tokens.refresh_token);
        Ok(id_token)
    }
}

impl<B: Browser> IdentityProvider for AzureAdProvider<B> {
    async fn acquire(&self, scopes: &[String]) -> Result<String, IdentityError> {
        let mut session = SessionCache::open(&self.session_path);
        if let Some(id_token) = self.acquire_silent(&mut session, scopes).await {
            return Ok(id_token);
        }
        self.acquire_interactive(&mut session, scopes).await
    }
}
