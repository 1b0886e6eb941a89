use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gateway_credential_helper::config::loader::load_config;
use gateway_credential_helper::launcher::client_command;
use gateway_credential_helper::utils::logging::{self, LogLevel};
use gateway_credential_helper::utils::paths::GatewayPaths;
use gateway_credential_helper::TokenBroker;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Launch Claude through the Databricks gateway", long_about = None)]
struct Args {
    /// Path to config.json
    #[arg(short, long, env = "CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Arguments passed through to the client
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    client_args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config and init logging
    // -------------------------------

    let args = Args::parse();
    let paths = GatewayPaths::resolve(args.config.as_deref())?;
    let config = load_config(args.config.as_deref(), &paths).await?;
    logging::run(config.logging.as_ref(), args.log_level);

    // -------------------------------
    // 2. Obtain a token
    // -------------------------------

    let broker = TokenBroker::from_config(&config, &paths).context("failed to build HTTP client")?;
    let token = broker
        .get_token()
        .await
        .context("Credential helper failed")?;

    // -------------------------------
    // 3. Hand over to the client
    // -------------------------------

    let mut command = client_command(&config, &token, &args.client_args);
    info!("launching {:?}", command.get_program());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = command.exec();
        Err(err).context("failed to exec client")
    }

    #[cfg(not(unix))]
    {
        let status = command.status().context("failed to start client")?;
        std::process::exit(status.code().unwrap_or(1));
    }
}
