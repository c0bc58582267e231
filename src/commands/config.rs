use anyhow::Result;
use colored::Colorize;
use moneybots_api::{config, init_tracing};
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show() -> Result<()> {
    init_tracing("warn");
    println!("{}", "Loading configuration...".yellow());

    let cfg = config::load_config()?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    print!("{}", cfg);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
///
/// Loads the environment and reports the first problem found
pub fn validate() -> Result<()> {
    init_tracing("warn");
    println!("{}", "Validating configuration...".yellow());

    let env_file = config::load_env_file()?;
    let cfg = config::load_config()?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  API: {} {}", cfg.api_name, cfg.api_version);
    println!("  Environment: {}", cfg.server_env);
    println!("  Port: {}", cfg.server_port);
    println!("  Log directory: {}", cfg.log_dir().display());
    println!("  Query log level: {}", cfg.postgres_log_level);
    println!(
        "  Env file: {}",
        env_file
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    info!("Configuration validation successful");
    Ok(())
}
