use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::utils::constants::EXPIRY_BUFFER_SECONDS;

/// The handful of ID token claims the session cache cares about. The
/// signature is not checked here; the exchange endpoint validates it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct IdTokenClaims {
    pub exp: Option<i64>,
    pub preferred_username: Option<String>,
}

/// Decodes the payload segment of a compact JWS.
pub fn claims(id_token: &str) -> Option<IdTokenClaims> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// True while the token's `exp` is further away than the expiry buffer.
pub fn is_fresh(id_token: &str, now: i64) -> bool {
    claims(id_token)
        .and_then(|c| c.exp)
        .map(|exp| (now as f64) < exp as f64 - EXPIRY_BUFFER_SECONDS)
        .unwrap_or(false)
}
