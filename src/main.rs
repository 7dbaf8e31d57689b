//! Job Board server.
//!
//! ```text
//! cargo run -- --env dev --port 3000
//! ```

use std::sync::Arc;

use anyhow::Result;
use job_board::config::AppConfig;
use job_board::gateway::{self, state::AppState};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = job_board::logging::init_logging(&app_config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting Job Board in {} mode",
        env
    );

    let port = get_port_override().unwrap_or(app_config.gateway.port);
    let state = Arc::new(AppState::from_config(&app_config).await?);

    gateway::run_server(&app_config.gateway.host, port, state).await
}
