//! Server state management
//!
//! One live game session, shared between handlers.

use pallanguzhi_core::GameConfig;
use pallanguzhi_core::Session;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Server-wide shared state
pub struct ServerState {
    pub default_config: GameConfig,
    pub game: RwLock<Option<Session>>,
}

impl ServerState {
    pub fn new(default_config: GameConfig) -> Self {
        Self {
            default_config,
            game: RwLock::new(None),
        }
    }

    /// Read access; a handler that panicked mid-write leaves a usable session
    pub fn read_game(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.game.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write_game(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.game.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
