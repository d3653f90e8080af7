//! latte bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p latte-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use latte_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(e) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {e}");
            }
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(name = %config.app.name, env = ?config.app.env, "Starting latte...");

    if let Err(e) = latte_bot::run(config).await {
        error!(error = %e, code = e.error_code(), "Bot stopped with an error");
        std::process::exit(1);
    }
}
