//! Environment handed to the Claude CLI when it is launched through the gateway.

use std::ffi::OsString;
use std::process::Command;

use crate::broker::IssuedToken;
use crate::config::GatewayConfig;

pub const CLIENT_BIN_ENV: &str = "GATEWAY_CLIENT_BIN";
pub const DEFAULT_CLIENT_BIN: &str = "claude";

pub fn client_env(config: &GatewayConfig, token: &IssuedToken) -> Vec<(&'static str, String)> {
    vec![
        ("ANTHROPIC_BASE_URL", config.base_url()),
        ("ANTHROPIC_AUTH_TOKEN", token.access_token.clone()),
        ("ANTHROPIC_MODEL", config.model.clone()),
    ]
}

pub fn client_program() -> OsString {
    std::env::var_os(CLIENT_BIN_ENV)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| OsString::from(DEFAULT_CLIENT_BIN))
}

/// Client command with the gateway environment and pass-through arguments.
pub fn client_command<I, S>(config: &GatewayConfig, token: &IssuedToken, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut command = Command::new(client_program());
    command
        .args(args.into_iter().map(Into::into))
        .envs(client_env(config, token));
    command
}
