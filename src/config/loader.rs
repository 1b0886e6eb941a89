use std::path::{Path, PathBuf};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::gateway::GatewayConfig;
use crate::error::ConfigError;
use crate::utils::constants::CONFIG_FILE_NAME;
use crate::utils::paths::GatewayPaths;

const REQUIRED_FIELDS: [&str; 4] = ["databricks_host", "endpoint_name", "model", "azure_ad"];
const REQUIRED_AZURE_AD_FIELDS: [&str; 2] = ["tenant_id", "client_id"];

/// Load config from the explicit path, `./config.json`, or the gateway directory.
pub async fn load_config(
    explicit: Option<&Path>,
    paths: &GatewayPaths,
) -> Result<GatewayConfig, ConfigError> {
    let path = resolve_config_path(explicit, paths)?;
    debug!("loading config from {}", path.display());
    file_to_config(&path).await
}

pub fn resolve_config_path(
    explicit: Option<&Path>,
    paths: &GatewayPaths,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }

    let cwd_path = std::env::current_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok()
        .filter(|p| p.exists());
    if let Some(path) = cwd_path {
        return Ok(path);
    }

    let home_path = paths.config_file();
    if home_path.exists() {
        return Ok(home_path);
    }
    Err(ConfigError::NoConfigFound(paths.dir().to_path_buf()))
}

pub async fn file_to_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let expanded = expand_env_vars(&content);
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_config(&expanded, yaml)
}

pub fn parse_config(content: &str, yaml: bool) -> Result<GatewayConfig, ConfigError> {
    let raw: Value = if yaml {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    } else {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
    .inspect_err(|e| error!("parse config error: {}", e))?;

    validate_required(&raw)?;
    serde_json::from_value(raw).map_err(|e| ConfigError::Invalid(e.to_string()))
}

fn validate_required(raw: &Value) -> Result<(), ConfigError> {
    let root = raw
        .as_object()
        .ok_or_else(|| ConfigError::Parse("config root must be an object".to_string()))?;

    if let Some(missing) = REQUIRED_FIELDS.iter().copied().find(|f| !root.contains_key(*f)) {
        return Err(ConfigError::MissingField(missing));
    }

    let azure_ad = root["azure_ad"]
        .as_object()
        .ok_or_else(|| ConfigError::Invalid("azure_ad must be an object".to_string()))?;
    if let Some(missing) = REQUIRED_AZURE_AD_FIELDS
        .iter()
        .copied()
        .find(|f| !azure_ad.contains_key(*f))
    {
        return Err(ConfigError::MissingAzureAdField(missing));
    }
    Ok(())
}

/// Replaces `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
