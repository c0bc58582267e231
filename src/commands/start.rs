use anyhow::Result;
use colored::Colorize;
use moneybots_api::{config, init_tracing, server};
use tracing::info;

/// Execute the start command
///
/// Loads configuration, initializes diagnostics at the configured level and
/// runs the server until a shutdown signal arrives.
pub async fn execute() -> Result<()> {
    println!("{}", "Starting Moneybots API...".green());

    let cfg = config::load_config()?;
    init_tracing(&cfg.server_log_level);

    info!(
        environment = %cfg.server_env,
        log_dir = %cfg.log_dir().display(),
        "Configuration loaded"
    );

    server::start_server(cfg).await
}
