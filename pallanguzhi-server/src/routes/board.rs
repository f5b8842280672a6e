//! Board layout endpoint

use axum::Json;
use pallanguzhi_core::{cycle_order, PitRef, Player, PITS_PER_ROW, ROWS};
use serde::Serialize;

#[derive(Serialize)]
pub struct BoardInfo {
    pub rows: usize,
    pub pits_per_row: usize,
    pub ai_row: usize,
    pub human_row: usize,
    /// Sowing order starting at human pit 0
    pub cycle: Vec<PitRef>,
}

/// Get board layout
pub async fn get_board() -> Json<BoardInfo> {
    Json(BoardInfo {
        rows: ROWS,
        pits_per_row: PITS_PER_ROW,
        ai_row: Player::Ai.row(),
        human_row: Player::Human.row(),
        cycle: cycle_order(),
    })
}
