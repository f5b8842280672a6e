//! Game API endpoints
//!
//! A single live game: the human sows from row 1, the AI answers on request.

use crate::routes::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use pallanguzhi_core::{MoveReport, Player, Session, Snapshot};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Start request; omitted fields come from the server's default config
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub name: Option<String>,
    pub shells_per_pit: Option<u32>,
    pub search_depth: Option<u32>,
    pub first_player: Option<Player>,
}

/// Human move request
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub pit: usize,
    pub row: Option<usize>,
}

fn move_response(report: &MoveReport, snapshot: Snapshot) -> Value {
    json!({
        "message": report.describe(),
        "report": report,
        "game": snapshot,
    })
}

/// Start a new game, replacing any game in progress
pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut config = state.default_config.clone();
    if let Some(name) = req.name {
        config.name = name;
    }
    if let Some(shells) = req.shells_per_pit {
        config.shells_per_pit = shells;
    }
    if let Some(depth) = req.search_depth {
        config.search_depth = depth;
    }
    if let Some(player) = req.first_player {
        config.first_player = player;
    }

    let session = Session::new(config)?;
    let snapshot = session.snapshot();
    *state.write_game() = Some(session);

    Ok(Json(snapshot))
}

/// Current game snapshot
pub async fn get_game(State(state): State<Arc<ServerState>>) -> Result<Json<Snapshot>, ApiError> {
    let game = state.read_game();
    let session = game.as_ref().ok_or_else(ApiError::no_game)?;
    Ok(Json(session.snapshot()))
}

/// Pits the human may sow now
pub async fn get_legal_moves(State(state): State<Arc<ServerState>>) -> Result<Json<Value>, ApiError> {
    let game = state.read_game();
    let session = game.as_ref().ok_or_else(ApiError::no_game)?;
    Ok(Json(json!({
        "current_player": session.state().current_player(),
        "row": Player::Human.row(),
        "pits": session.legal_pits(),
    })))
}

/// Commit a human move
pub async fn make_player_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut game = state.write_game();
    let session = game.as_mut().ok_or_else(ApiError::no_game)?;

    let row = req.row.unwrap_or(Player::Human.row());
    let report = session.choose_move(row, req.pit)?;
    Ok(Json(move_response(&report, session.snapshot())))
}

/// Search for the AI move off the async runtime, then commit it
pub async fn get_ai_move(State(state): State<Arc<ServerState>>) -> Result<Json<Value>, ApiError> {
    let job = {
        let game = state.read_game();
        let session = game.as_ref().ok_or_else(ApiError::no_game)?;
        session.ai_search()?
    };

    let ticket = job.ticket();
    let result = tokio::task::spawn_blocking(move || job.run())
        .await
        .map_err(|e| ApiError::internal(format!("AI search failed: {}", e)))?;
    let pit = result
        .best_pit
        .ok_or(pallanguzhi_core::GameError::NoLegalMove(Player::Ai))?;

    let mut game = state.write_game();
    let session = game.as_mut().ok_or_else(ApiError::no_game)?;
    let report = session.commit_ai_move(ticket, pit)?;

    tracing::info!(
        "AI played pit {} (score {}, {} nodes)",
        pit,
        result.score,
        result.nodes
    );

    let mut response = move_response(&report, session.snapshot());
    response["pit"] = json!(pit);
    response["search"] = json!(result);
    Ok(Json(response))
}
