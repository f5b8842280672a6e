//! GameConfig - opening size, search depth and turn order

use crate::ai::{AlphaBetaAI, DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH};
use crate::board::{Player, DEFAULT_SHELLS_PER_PIT, TOTAL_PITS};
use crate::error::GameError;
use crate::game::GameState;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub shells_per_pit: u32,
    pub search_depth: u32,
    pub first_player: Player,
}

impl GameConfig {
    /// Check the values a game can actually be played with
    pub fn validate(&self) -> Result<(), GameError> {
        if self.shells_per_pit == 0 {
            return Err(GameError::InvalidConfig(
                "shells_per_pit must be at least 1".to_string(),
            ));
        }
        if self.shells_per_pit > u32::MAX / (4 * TOTAL_PITS as u32) {
            return Err(GameError::InvalidConfig(format!(
                "shells_per_pit {} is too large",
                self.shells_per_pit
            )));
        }
        if self.search_depth == 0 || self.search_depth > MAX_SEARCH_DEPTH {
            return Err(GameError::InvalidConfig(format!(
                "search_depth must be between 1 and {}, got {}",
                MAX_SEARCH_DEPTH, self.search_depth
            )));
        }
        Ok(())
    }

    /// Shells in play for this opening
    pub fn total_shells(&self) -> u32 {
        self.shells_per_pit * TOTAL_PITS as u32
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn with_shells(mut self, shells_per_pit: u32) -> Self {
        self.shells_per_pit = shells_per_pit;
        self
    }

    pub fn with_first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    /// Opening position for this config
    pub fn initial_state(&self) -> GameState {
        GameState::new(self.shells_per_pit, self.first_player)
    }

    pub fn ai(&self) -> AlphaBetaAI {
        AlphaBetaAI::new(self.search_depth)
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            shells_per_pit: DEFAULT_SHELLS_PER_PIT,
            search_depth: DEFAULT_SEARCH_DEPTH,
            first_player: Player::Human,
        }
    }
}
