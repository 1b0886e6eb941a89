//! Identity provider session cache.
//!
//! `SessionCache::open` returns a handle that is mutated in memory and
//! written back at most once, when the handle is dropped, and only if
//! something changed.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::atomic_file::write_private_blocking;

const SESSION_FORMAT_VERSION: u32 = 1;

/// Signed-in account for one (tenant, client) pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSession {
    pub tenant_id: String,
    pub client_id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSession")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionState {
    version: u32,
    #[serde(default)]
    accounts: Vec<AccountSession>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            accounts: Vec::new(),
        }
    }
}

pub struct SessionCache {
    path: PathBuf,
    state: SessionState,
    dirty: bool,
}

impl SessionCache {
    /// Loads the session file; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!("ignoring unreadable session cache {}: {}", path.display(), err);
                SessionState::default()
            }),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("cannot read session cache {}: {}", path.display(), err);
                }
                SessionState::default()
            }
        };
        debug!("session cache opened with {} account(s)", state.accounts.len());
        Self {
            path,
            state,
            dirty: false,
        }
    }

    pub fn has_state_changed(&self) -> bool {
        self.dirty
    }

    pub fn account(&self, tenant_id: &str, client_id: &str) -> Option<&AccountSession> {
        self.state
            .accounts
            .iter()
            .find(|a| a.tenant_id == tenant_id && a.client_id == client_id)
    }

    /// Inserts or replaces the account for its (tenant, client) pair.
    pub fn upsert(&mut self, account: AccountSession) {
        let existing = self
            .state
            .accounts
            .iter_mut()
            .find(|a| a.tenant_id == account.tenant_id && a.client_id == account.client_id);
        match existing {
            Some(slot) if *slot == account => return,
            Some(slot) => *slot = account,
            None => self.state.accounts.push(account),
        }
        self.dirty = true;
    }

    pub fn remove(&mut self, tenant_id: &str, client_id: &str) -> bool {
        let before = self.state.accounts.len();
        self.state
            .accounts
            .retain(|a| !(a.tenant_id == tenant_id && a.client_id == client_id));
        let removed = self.state.accounts.len() != before;
        self.dirty |= removed;
        removed
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        let written = serde_json::to_vec(&self.state)
            .map_err(std::io::Error::other)
            .and_then(|bytes| write_private_blocking(&self.path, &bytes));
        match written {
            Ok(()) => {
                debug!("session cache written to {}", self.path.display());
                self.dirty = false;
            }
            Err(err) => warn!("failed to write session cache {}: {}", self.path.display(), err),
        }
    }
}

impl Drop for SessionCache {
    fn drop(&mut self) {
        self.flush();
    }
}
