use anyhow::{bail, Context, Result};
use colored::Colorize;
use moneybots_api::logging::LoggerHandle;
use moneybots_api::repository::{Database, UserStore};
use moneybots_api::{auth, config, init_tracing};

/// Execute the user add command
///
/// Hashes the password with argon2 and upserts the row into `auth`
pub async fn add(user_id: &str, password: &str) -> Result<()> {
    init_tracing("warn");

    let user_id = user_id.trim();
    if user_id.is_empty() || password.is_empty() {
        bail!("user id and password must not be empty");
    }

    let cfg = config::load_config()?;
    let db = Database::connect(&cfg, LoggerHandle::new()).await?;

    let hashed = auth::hash_password(password)?;
    db.upsert_user(user_id, &hashed)
        .await
        .with_context(|| format!("Failed to save user {}", user_id))?;

    println!("{} {}", "✓ Saved user".green(), user_id);
    Ok(())
}
