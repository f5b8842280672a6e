//! Pallanguzhi Server - HTTP API for playing against the AI
//!
//! This crate provides the web backend:
//! - REST API for starting a game, human moves and AI moves
//! - Board layout for front ends
//! - Static file serving for a browser UI

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use pallanguzhi_core::GameConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use routes::error::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Settings for games started without overrides
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8002,
            static_dir: "static".to_string(),
            game: GameConfig::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board layout
        .route("/api/board", get(routes::board::get_board))
        // Game API
        .route("/api/game", get(routes::game::get_game))
        .route("/api/game/start", post(routes::game::start_game))
        .route("/api/game/legal-moves", get(routes::game::get_legal_moves))
        .route("/api/game/move", post(routes::game::make_player_move))
        .route("/api/game/ai-move", post(routes::game::get_ai_move))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    config.game.validate()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(config.game.clone()));
    let router = create_router(&config, state);

    tracing::info!("Pallanguzhi server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    tracing::info!(
        "Default game: {} shells per pit, search depth {}",
        config.game.shells_per_pit,
        config.game.search_depth
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
