//! Example to run the Pallanguzhi server standalone
//!
//! Run with: cargo run -p pallanguzhi-server --example run_server

use pallanguzhi_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::default();

    println!("Starting Pallanguzhi server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);
    println!("Start a game with: curl -X POST -H 'Content-Type: application/json' -d '{{}}' http://localhost:{}/api/game/start", config.port);

    run_server(config).await
}
