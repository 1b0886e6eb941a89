use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gateway_credential_helper::config::loader::load_config;
use gateway_credential_helper::utils::logging::{self, LogLevel};
use gateway_credential_helper::utils::paths::GatewayPaths;
use gateway_credential_helper::TokenBroker;
use serde_json::json;
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about = "Databricks Claude Gateway credential helper", long_about = None)]
struct Args {
    /// Path to config.json
    #[arg(short, long, env = "CONFIG")]
    config: Option<PathBuf>,
    /// Check token validity without refresh
    #[arg(long, conflicts_with = "clear")]
    check: bool,
    /// Remove the cached token from every backend
    #[arg(long)]
    clear: bool,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // -------------------------------
    // 1. Load config and init logging
    // -------------------------------

    let args = Args::parse();
    let paths = GatewayPaths::resolve(args.config.as_deref())?;
    let config = load_config(args.config.as_deref(), &paths).await?;
    logging::run(config.logging.as_ref(), args.log_level);
    debug!("gateway directory: {}", paths.dir().display());

    // -------------------------------
    // 2. Wire cache, identity provider and exchange client
    // -------------------------------

    let broker = TokenBroker::from_config(&config, &paths).context("failed to build HTTP client")?;

    // -------------------------------
    // 3. Run the requested mode
    // -------------------------------

    if args.clear {
        broker.clear().await;
        println!("{}", json!({ "cleared": true }));
        return Ok(ExitCode::SUCCESS);
    }

    if args.check {
        let report = broker.check().await;
        let status = report.write_to(&mut std::io::stdout(), &mut std::io::stderr())?;
        return Ok(ExitCode::from(status));
    }

    let token = broker.get_token().await?;
    println!("{}", serde_json::to_string(&token)?);
    Ok(ExitCode::SUCCESS)
}
