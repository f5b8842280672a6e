//! Session - one live game between a human and the AI
//!
//! The human plays row 1 and the AI row 0. The session enforces turn order;
//! the AI search can run on a detached [`SearchJob`] so callers holding the
//! session behind a lock do not block while it thinks.

use crate::ai::{AlphaBetaAI, SearchResult};
use crate::board::{Player, PITS_PER_ROW, TOTAL_PITS};
use crate::config::GameConfig;
use crate::error::{GameError, InvalidMove, Result};
use crate::game::{EndReason, GameResult, GameState, MoveReport};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

/// Serializable view of the session for front ends
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game_id: u64,
    /// All 14 pit counts, AI row first
    pub pits: [u32; TOTAL_PITS],
    pub ai_row: [u32; PITS_PER_ROW],
    pub human_row: [u32; PITS_PER_ROW],
    pub human_wallet: u32,
    pub ai_wallet: u32,
    pub current_player: Player,
    pub result: GameResult,
    pub end_reason: Option<EndReason>,
    pub total_shells: u32,
    pub moves_played: u32,
    pub search_depth: u32,
    pub legal_pits: Vec<usize>,
    pub last_move: Option<MoveReport>,
}

/// Identifies the position a search was started from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTicket {
    pub game_id: u64,
    pub move_number: u32,
}

/// A search detached from the live session
#[derive(Clone, Debug)]
pub struct SearchJob {
    state: GameState,
    ai: AlphaBetaAI,
    game_id: u64,
}

impl SearchJob {
    pub fn run(&self) -> SearchResult {
        let result = self.ai.search(&self.state);
        tracing::debug!(
            "Search at move {}: pit {:?}, score {}, {} nodes",
            self.move_number(),
            result.best_pit,
            result.score,
            result.nodes
        );
        result
    }

    /// Move count of the position being searched
    pub fn move_number(&self) -> u32 {
        self.state.moves_played()
    }

    pub fn ticket(&self) -> SearchTicket {
        SearchTicket {
            game_id: self.game_id,
            move_number: self.move_number(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    game_id: u64,
    state: GameState,
    ai: AlphaBetaAI,
    config: GameConfig,
    last_move: Option<MoveReport>,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let state = config.initial_state();
        Ok(Self::from_state(config, state))
    }

    /// Resume from an existing position
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        let game_id = NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            "New session {} '{}': {} shells, depth {}, {} to move",
            game_id,
            config.name,
            state.total_shells(),
            config.search_depth,
            state.current_player()
        );
        Self {
            game_id,
            ai: config.ai(),
            state,
            config,
            last_move: None,
        }
    }

    /// Unique per session created in this process
    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn last_move(&self) -> Option<&MoveReport> {
        self.last_move.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        let board = self.state.board();
        Snapshot {
            game_id: self.game_id,
            pits: board.counts(),
            ai_row: *board.row(Player::Ai),
            human_row: *board.row(Player::Human),
            human_wallet: self.state.human_wallet(),
            ai_wallet: self.state.ai_wallet(),
            current_player: self.state.current_player(),
            result: self.state.result(),
            end_reason: self.state.end_reason(),
            total_shells: self.state.total_shells(),
            moves_played: self.state.moves_played(),
            search_depth: self.ai.depth,
            legal_pits: self.legal_pits(),
            last_move: self.last_move.clone(),
        }
    }

    /// Pits the human may sow right now (empty unless it is their turn)
    pub fn legal_pits(&self) -> Vec<usize> {
        if self.state.current_player() != Player::Human {
            return vec![];
        }
        self.state.legal_pits()
    }

    pub fn is_legal_move(&self, row: usize, pit: usize) -> bool {
        row == Player::Human.row()
            && self.state.current_player() == Player::Human
            && self.state.is_legal_move(row, pit)
    }

    /// Commit a human move
    pub fn choose_move(&mut self, row: usize, pit: usize) -> Result<MoveReport> {
        if self.state.result().is_over() {
            return Err(GameError::GameOver);
        }
        let owner = Player::from_row(row).ok_or(InvalidMove::RowOutOfRange { row })?;
        if owner != Player::Human {
            return Err(InvalidMove::WrongRow {
                mover: Player::Human,
                owner,
            }
            .into());
        }
        if self.state.current_player() != Player::Human {
            return Err(GameError::NotYourTurn(Player::Human));
        }

        let report = self.state.play(pit)?;
        self.record(&report);
        Ok(report)
    }

    /// Snapshot the position for an AI search
    pub fn ai_search(&self) -> Result<SearchJob> {
        if self.state.result().is_over() {
            return Err(GameError::GameOver);
        }
        if self.state.current_player() != Player::Ai {
            return Err(GameError::NotYourTurn(Player::Ai));
        }
        Ok(SearchJob {
            state: self.state.clone(),
            ai: self.ai.clone(),
            game_id: self.game_id,
        })
    }

    /// Commit the AI move found by the search holding `ticket`
    pub fn commit_ai_move(&mut self, ticket: SearchTicket, pit: usize) -> Result<MoveReport> {
        if ticket.game_id != self.game_id || ticket.move_number != self.state.moves_played() {
            return Err(GameError::StaleSearch);
        }
        if self.state.result().is_over() {
            return Err(GameError::GameOver);
        }
        if self.state.current_player() != Player::Ai {
            return Err(GameError::NotYourTurn(Player::Ai));
        }

        let report = self.state.play(pit)?;
        self.record(&report);
        Ok(report)
    }

    /// Best pit for the AI, without playing it
    pub fn request_ai_move(&self) -> Result<Option<usize>> {
        Ok(self.ai_search()?.run().best_pit)
    }

    /// Search and commit the AI move
    pub fn play_ai_move(&mut self) -> Result<MoveReport> {
        let job = self.ai_search()?;
        let pit = job.run().best_pit.ok_or(GameError::NoLegalMove(Player::Ai))?;
        self.commit_ai_move(job.ticket(), pit)
    }

    fn record(&mut self, report: &MoveReport) {
        if report.result.is_over() {
            tracing::info!(
                "Game over after {} moves: {:?} (human {}, AI {})",
                self.state.moves_played(),
                report.result,
                self.state.human_wallet(),
                self.state.ai_wallet()
            );
        }
        self.last_move = Some(report.clone());
    }
}
