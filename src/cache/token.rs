use std::fmt;

use serde::{Deserialize, Serialize};

use crate::helpers::time::now_f64;
use crate::utils::constants::{DEFAULT_TOKEN_TYPE, EXPIRY_BUFFER_SECONDS};

/// One cached bearer credential. Replaced wholesale on refresh.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    /// UNIX timestamp, seconds with sub-second precision
    pub expires_at: f64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl CachedToken {
    pub fn new(access_token: String, expires_at: f64, token_type: String) -> Self {
        Self {
            access_token,
            expires_at,
            token_type,
        }
    }

    /// Usable iff `now < expires_at - EXPIRY_BUFFER_SECONDS`.
    pub fn is_valid_at(&self, now: f64) -> bool {
        now < self.expires_at - EXPIRY_BUFFER_SECONDS
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_f64())
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}
