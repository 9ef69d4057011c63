//! Mentiq - command-line entry point
//!
//! Loads configuration, restores any saved session and reports health.

use mentiq_app::utils::logging;
use mentiq_app::AppContext;
use mentiq_infra::config;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();
    logging::init_tracing();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => warn!(error = %err, "No .env file loaded"),
    }

    let config = config::load()?;
    let context = AppContext::new(config)?;

    match context.session.restore().await {
        Some(user) => info!(user_id = %user.id, role = %user.role, "Session restored"),
        None => info!("No saved session"),
    }

    let health = context.health_check().await;
    println!("{}", serde_json::to_string_pretty(&health)?);

    if !health.is_healthy {
        warn!(message = ?health.message, "Mentiq client is degraded");
    }
    Ok(())
}
