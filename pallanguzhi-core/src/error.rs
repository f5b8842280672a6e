//! Error types for the rules engine and game session

use crate::board::{PitRef, Player, PITS_PER_ROW};
use thiserror::Error;

/// Reasons a requested pit cannot be sown
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("row {row} does not exist")]
    RowOutOfRange { row: usize },

    #[error("pit {pit} is out of range (0..{})", PITS_PER_ROW)]
    PitOutOfRange { pit: usize },

    #[error("pit {pit} in the {player} row is empty")]
    EmptyPit { player: Player, pit: usize },

    #[error("the {mover} player cannot sow from the {owner} row")]
    WrongRow { mover: Player, owner: Player },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),

    #[error("it is not the {0} player's turn")]
    NotYourTurn(Player),

    #[error("the game is already over")]
    GameOver,

    #[error("the {0} player has no legal move")]
    NoLegalMove(Player),

    #[error("sowing from {start} did not settle after {drops} drops")]
    EndlessRelay { start: PitRef, drops: u32 },

    #[error("the game changed while the AI was searching")]
    StaleSearch,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
