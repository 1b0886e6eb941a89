//! Identity acquisition
//!
//! Obtains an identity-provider assertion (an OIDC ID token) for the token
//! exchange: silently from a stored session when possible, interactively
//! otherwise.

use std::future::Future;

use tracing::warn;

use crate::error::IdentityError;

pub mod azure_ad;
pub mod id_token;
pub mod loopback;
pub mod session;

pub use azure_ad::AzureAdProvider;

pub trait IdentityProvider {
    fn acquire(
        &self,
        scopes: &[String],
    ) -> impl Future<Output = Result<String, IdentityError>> + Send;
}

/// Presents the authorization url to the user.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str);
}

/// Prints the url on stderr and tries the platform browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) {
        eprintln!("Opening browser for Azure AD sign-in. If it does not open, visit:\n{url}");
        if let Err(err) = webbrowser::open(url) {
            warn!("could not launch a browser: {}", err);
        }
    }
}
