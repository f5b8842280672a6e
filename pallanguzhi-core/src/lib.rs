//! Pallanguzhi Core - Rules engine and AI
//!
//! This crate provides the core game logic for Pallanguzhi:
//! - Board layout (two rows of seven pits) and the sowing cycle
//! - Relay sowing and capture
//! - Game state, wallets and end-of-game detection
//! - Alpha-beta search over captured shells
//! - Game configuration and the live human-vs-AI session

pub mod board;
pub mod rules;
pub mod game;
pub mod ai;
pub mod config;
pub mod error;
pub mod session;

// Re-exports for convenient access
pub use board::{cycle_order, Board, PitRef, Player, PITS_PER_ROW, ROWS, TOTAL_PITS};
pub use rules::{capture_from, is_playable, next_pit, play_pit, sow_move, sow_move_traced, SowEvent, SowOutcome, Turn};
pub use game::{EndReason, GameResult, GameState, MoveReport};
pub use ai::{AlphaBetaAI, SearchNode, SearchResult, DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH};
pub use config::GameConfig;
pub use error::{GameError, InvalidMove, Result};
pub use session::{SearchJob, SearchTicket, Session, Snapshot};
