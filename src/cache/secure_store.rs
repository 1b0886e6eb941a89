use std::fmt;

use keyring::Entry;

use crate::cache::token::CachedToken;
use crate::error::CacheBackendError;
use crate::utils::constants::{KEYRING_KEY, KEYRING_SERVICE};

/// A single named secret in a platform credential store.
pub trait SecretSlot: Send + Sync {
    /// `Ok(None)` when the slot holds nothing.
    fn read(&self) -> Result<Option<String>, CacheBackendError>;
    fn write(&self, secret: &str) -> Result<(), CacheBackendError>;
    /// `Ok(false)` when there was nothing to delete.
    fn erase(&self) -> Result<bool, CacheBackendError>;
}

/// OS keychain slot (macOS Keychain, Windows Credential Manager, Linux keyutils).
#[derive(Debug, Clone)]
pub struct KeyringSlot {
    service: String,
    key: String,
}

impl KeyringSlot {
    pub fn new(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    fn entry(&self) -> Result<Entry, CacheBackendError> {
        Entry::new(&self.service, &self.key).map_err(unavailable)
    }
}

impl Default for KeyringSlot {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE, KEYRING_KEY)
    }
}

fn unavailable(err: keyring::Error) -> CacheBackendError {
    CacheBackendError::Unavailable(err.to_string())
}

impl SecretSlot for KeyringSlot {
    fn read(&self) -> Result<Option<String>, CacheBackendError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(unavailable(e)),
        }
    }

    fn write(&self, secret: &str) -> Result<(), CacheBackendError> {
        self.entry()?.set_password(secret).map_err(unavailable)
    }

    fn erase(&self) -> Result<bool, CacheBackendError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(unavailable(e)),
        }
    }
}

/// Secure-store backend: the cached token serialized as JSON into one slot.
pub struct SecureStore {
    slot: Box<dyn SecretSlot>,
}

impl SecureStore {
    pub fn new(slot: impl SecretSlot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
        }
    }

    pub fn keyring() -> Self {
        Self::new(KeyringSlot::default())
    }

    pub fn get(&self) -> Result<Option<CachedToken>, CacheBackendError> {
        match self.slot.read()? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    pub fn set(&self, token: &CachedToken) -> Result<(), CacheBackendError> {
        let raw = serde_json::to_string(token)?;
        self.slot.write(&raw)
    }

    pub fn delete(&self) -> Result<bool, CacheBackendError> {
        self.slot.erase()
    }
}

impl fmt::Debug for SecureStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureStore").finish_non_exhaustive()
    }
}
