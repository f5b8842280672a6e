//! Server command - start the HTTP server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to pallanguzhi-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use pallanguzhi_core::GameConfig;
use pallanguzhi_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8002")]
    pub port: u16,

    /// Directory containing static files for a browser UI
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Default AI search depth for new games
    #[arg(long)]
    pub depth: Option<u32>,

    /// Default shells per pit for new games
    #[arg(long)]
    pub shells: Option<u32>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs, game: GameConfig) -> Result<()> {
    let config = configure_server(&args, game)?;

    tracing::info!("Starting Pallanguzhi server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs, game: GameConfig) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;
    let game = crate::apply_overrides(game, args.depth, args.shells)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        game,
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but only the API is available.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!("Static path exists but is not a directory: {}", path.display());
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
