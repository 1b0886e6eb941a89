use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::utils::constants::{
    CONFIG_FILE_NAME, GATEWAY_DIR_NAME, GATEWAY_HOME_ENV, SESSION_CACHE_FILE_NAME,
    TOKEN_CACHE_FILE_NAME,
};

/// Per-user state directory holding the config, the token cache and the
/// identity provider session cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPaths {
    dir: PathBuf,
}

impl GatewayPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$GATEWAY_HOME` when set, otherwise `~/.databricks-claude-gateway`.
    /// Without a home directory the state lives next to an explicit config file.
    pub fn resolve(explicit_config: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(
            std::env::var_os(GATEWAY_HOME_ENV),
            dirs::home_dir(),
            explicit_config,
        )
    }

    pub fn resolve_with(
        gateway_home: Option<OsString>,
        home: Option<PathBuf>,
        explicit_config: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = gateway_home.filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        if let Some(home) = home {
            return Ok(Self::new(home.join(GATEWAY_DIR_NAME)));
        }
        match explicit_config.and_then(Path::parent) {
            Some(parent) if parent.as_os_str().is_empty() => Ok(Self::new(".")),
            Some(parent) => Ok(Self::new(parent)),
            None => Err(ConfigError::NoHomeDir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn token_cache_file(&self) -> PathBuf {
        self.dir.join(TOKEN_CACHE_FILE_NAME)
    }

    pub fn session_cache_file(&self) -> PathBuf {
        self.dir.join(SESSION_CACHE_FILE_NAME)
    }
}
