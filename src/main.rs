//! mock-a-parser: a one-shot mock parser backend.
//!
//! Binds the configured address, serves exactly one connection (read until
//! the terminator or end-of-stream, answer with the fixed JSON payload),
//! then exits. Intended as a test double for parser clients; failures
//! abort the process loudly rather than being recovered.

use mock_a_parser::config::Config;
use mock_a_parser::server::OneShotServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(listen = %config.listen, "Starting mock parser backend");

    let server = OneShotServer::bind(&config.listen).await?;
    let received = server.serve().await?;

    info!(bytes = received.len(), "Request served, shutting down");
    Ok(())
}
