//! Game state: live board, wallets, turn order and end-of-game detection

use crate::board::{Board, PitRef, Player, PITS_PER_ROW};
use crate::error::{GameError, InvalidMove, Result};
use crate::rules::{is_playable, play_pit};
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Ongoing,
    HumanWins,
    AiWins,
    Draw,
}

impl GameResult {
    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::HumanWins => Some(Player::Human),
            GameResult::AiWins => Some(Player::Ai),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }

    fn won_by(player: Player) -> Self {
        match player {
            Player::Human => GameResult::HumanWins,
            Player::Ai => GameResult::AiWins,
        }
    }
}

/// Why the game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A row ran out of shells
    EmptyRow,
    /// A wallet holds more than half of all shells
    Majority,
    /// The side to move has shells but every pit relays forever
    NoPlayablePit,
}

/// Everything a front end needs to show after a committed move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub player: Player,
    pub pit: usize,
    pub terminal: PitRef,
    pub captured_from: PitRef,
    pub captured: u32,
    pub relays: u32,
    pub human_swept: u32,
    pub ai_swept: u32,
    pub result: GameResult,
    pub end_reason: Option<EndReason>,
}

impl MoveReport {
    /// One-based pit label as shown to players
    pub fn display_pit(&self) -> usize {
        self.pit + 1
    }

    pub fn describe(&self) -> String {
        match (self.player, self.result) {
            (Player::Human, GameResult::Ongoing) => {
                format!("You played pit {}. AI's move.", self.display_pit())
            }
            (Player::Ai, GameResult::Ongoing) => {
                format!("AI played pit {}. Your move.", self.display_pit())
            }
            (Player::Human, _) => format!("You played pit {}.", self.display_pit()),
            (Player::Ai, _) => format!("AI played pit {}.", self.display_pit()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Settlement {
    human_swept: u32,
    ai_swept: u32,
    reason: Option<EndReason>,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to branch)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    human_wallet: u32,
    ai_wallet: u32,
    current_player: Player,
    total_shells: u32,
    result: GameResult,
    end_reason: Option<EndReason>,
    moves_played: u32,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Opening position with `shells_per_pit` in every pit
    pub fn new(shells_per_pit: u32, first_player: Player) -> Self {
        Self::from_position(Board::new(shells_per_pit), 0, 0, first_player)
    }

    /// Arbitrary position; end conditions are checked immediately
    pub fn from_position(board: Board, human_wallet: u32, ai_wallet: u32, to_move: Player) -> Self {
        let mut state = Self {
            board,
            human_wallet,
            ai_wallet,
            current_player: to_move,
            total_shells: board.total() + human_wallet + ai_wallet,
            result: GameResult::Ongoing,
            end_reason: None,
            moves_played: 0,
        };
        state.settle();
        state
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn wallet(&self, player: Player) -> u32 {
        match player {
            Player::Human => self.human_wallet,
            Player::Ai => self.ai_wallet,
        }
    }

    pub fn human_wallet(&self) -> u32 {
        self.human_wallet
    }

    pub fn ai_wallet(&self) -> u32 {
        self.ai_wallet
    }

    /// Shells in play, constant for the whole game
    pub fn total_shells(&self) -> u32 {
        self.total_shells
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Whether `row`/`pit` may be sown by the player to move
    pub fn is_legal_move(&self, row: usize, pit: usize) -> bool {
        self.check_move(row, pit)
            .map(|pos| is_playable(&self.board, pos))
            .unwrap_or(false)
    }

    /// Playable pits of the player to move, ascending
    pub fn legal_pits(&self) -> Vec<usize> {
        if self.result.is_over() {
            return vec![];
        }
        playable_pits(&self.board, self.current_player)
    }

    fn check_move(&self, row: usize, pit: usize) -> Result<PitRef> {
        if self.result.is_over() {
            return Err(GameError::GameOver);
        }
        let owner = Player::from_row(row).ok_or(InvalidMove::RowOutOfRange { row })?;
        if owner != self.current_player {
            return Err(InvalidMove::WrongRow {
                mover: self.current_player,
                owner,
            }
            .into());
        }
        if pit >= PITS_PER_ROW {
            return Err(InvalidMove::PitOutOfRange { pit }.into());
        }
        let pos = PitRef::new(owner, pit);
        if self.board.get(pos) == 0 {
            return Err(InvalidMove::EmptyPit { player: owner, pit }.into());
        }
        Ok(pos)
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Sow `pit` of the player to move, capture, then check for the end
    pub fn play(&mut self, pit: usize) -> Result<MoveReport> {
        let player = self.current_player;
        let start = self.check_move(player.row(), pit)?;

        let turn = play_pit(&mut self.board, start)?;
        match player {
            Player::Human => self.human_wallet += turn.captured,
            Player::Ai => self.ai_wallet += turn.captured,
        }
        self.moves_played += 1;
        self.current_player = player.opponent();

        let settlement = self.settle();

        tracing::debug!(
            "{} sowed pit {} -> {} ({} relays), captured {}",
            player,
            pit,
            turn.terminal,
            turn.relays,
            turn.captured
        );

        Ok(MoveReport {
            player,
            pit,
            terminal: turn.terminal,
            captured_from: turn.captured_from,
            captured: turn.captured,
            relays: turn.relays,
            human_swept: settlement.human_swept,
            ai_swept: settlement.ai_swept,
            result: self.result,
            end_reason: settlement.reason,
        })
    }

    /// Apply a move to a copy
    pub fn apply_move(&self, pit: usize) -> Result<(Self, MoveReport)> {
        let mut next = self.clone();
        let report = next.play(pit)?;
        Ok((next, report))
    }

    // ========================================================================
    // END OF GAME
    // ========================================================================

    fn settle(&mut self) -> Settlement {
        if self.result.is_over() {
            return Settlement::default();
        }

        let ai_empty = self.board.row_is_empty(Player::Ai);
        let human_empty = self.board.row_is_empty(Player::Human);

        if ai_empty || human_empty {
            // The player whose opponent ran dry collects their own row
            let human_swept = if ai_empty { self.sweep(Player::Human) } else { 0 };
            let ai_swept = if human_empty { self.sweep(Player::Ai) } else { 0 };
            return self.finish(EndReason::EmptyRow, human_swept, ai_swept);
        }

        for player in Player::ALL {
            if self.wallet(player) * 2 > self.total_shells {
                self.result = GameResult::won_by(player);
                self.end_reason = Some(EndReason::Majority);
                return Settlement {
                    reason: Some(EndReason::Majority),
                    ..Settlement::default()
                };
            }
        }

        if playable_pits(&self.board, self.current_player).is_empty() {
            tracing::warn!("{} has no playable pit, ending game", self.current_player);
            let human_swept = self.sweep(Player::Human);
            let ai_swept = self.sweep(Player::Ai);
            return self.finish(EndReason::NoPlayablePit, human_swept, ai_swept);
        }

        Settlement::default()
    }

    fn sweep(&mut self, player: Player) -> u32 {
        let swept = self.board.clear_row(player);
        match player {
            Player::Human => self.human_wallet += swept,
            Player::Ai => self.ai_wallet += swept,
        }
        swept
    }

    fn finish(&mut self, reason: EndReason, human_swept: u32, ai_swept: u32) -> Settlement {
        self.result = match self.human_wallet.cmp(&self.ai_wallet) {
            std::cmp::Ordering::Greater => GameResult::HumanWins,
            std::cmp::Ordering::Less => GameResult::AiWins,
            std::cmp::Ordering::Equal => GameResult::Draw,
        };
        self.end_reason = Some(reason);
        tracing::debug!(
            "game over ({:?}): human {} - AI {}",
            reason,
            self.human_wallet,
            self.ai_wallet
        );
        Settlement {
            human_swept,
            ai_swept,
            reason: Some(reason),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(crate::board::DEFAULT_SHELLS_PER_PIT, Player::Human)
    }
}

/// Pits of `player` that are non-empty and whose sowing settles
pub fn playable_pits(board: &Board, player: Player) -> Vec<usize> {
    board
        .occupied_pits(player)
        .filter(|&pit| is_playable(board, PitRef::new(player, pit)))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn conserved(state: &GameState) -> bool {
        state.board().total() + state.human_wallet() + state.ai_wallet() == state.total_shells()
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::default();
        assert_eq!(game.current_player(), Player::Human);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.total_shells(), 84);
        assert_eq!(game.legal_pits(), (0..PITS_PER_ROW).collect::<Vec<_>>());
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = GameState::default();
        let report = game.play(2).unwrap();
        assert_eq!(report.player, Player::Human);
        assert_eq!(game.current_player(), Player::Ai);
        assert!(game.is_legal_move(Player::Ai.row(), 0));
        assert!(!game.is_legal_move(Player::Human.row(), 0));
    }

    #[test]
    fn test_illegal_moves_are_rejected() {
        let mut game = GameState::from_position(
            Board::from_rows([1; 7], [0, 2, 0, 0, 0, 0, 0]),
            0,
            0,
            Player::Human,
        );
        assert_eq!(
            game.play(0).unwrap_err(),
            GameError::InvalidMove(InvalidMove::EmptyPit {
                player: Player::Human,
                pit: 0
            })
        );
        assert_eq!(
            game.play(9).unwrap_err(),
            GameError::InvalidMove(InvalidMove::PitOutOfRange { pit: 9 })
        );
        assert!(!game.is_legal_move(Player::Ai.row(), 3));
        assert!(!game.is_legal_move(5, 0));
        assert_eq!(game.moves_played(), 0);
    }

    #[test]
    fn test_capture_credits_mover() {
        let mut game = GameState::from_position(
            Board::from_rows([0, 0, 3, 0, 0, 0, 0], [2, 0, 0, 0, 0, 0, 5]),
            0,
            0,
            Player::Human,
        );
        let report = game.play(0).unwrap();
        assert_eq!(report.captured, 5);
        // The capture emptied the human row, so the AI sweeps its own
        assert_eq!(report.end_reason, Some(EndReason::EmptyRow));
        assert_eq!(report.ai_swept, 5);
        assert_eq!(game.human_wallet(), 5);
        assert_eq!(game.ai_wallet(), 5);
        assert_eq!(game.result(), GameResult::Draw);
        assert!(conserved(&game));
    }

    #[test]
    fn test_empty_row_sweeps_opponent_row() {
        let game = GameState::from_position(
            Board::from_rows([4, 0, 3, 0, 0, 0, 1], [0; 7]),
            10,
            4,
            Player::Human,
        );
        assert_eq!(game.result(), GameResult::AiWins);
        assert_eq!(game.result().winner(), Some(Player::Ai));
        assert_eq!(game.end_reason(), Some(EndReason::EmptyRow));
        assert_eq!(game.ai_wallet(), 12);
        assert!(game.board().row_is_empty(Player::Ai));
        assert!(conserved(&game));

        let game = GameState::from_position(
            Board::from_rows([0; 7], [1, 1, 0, 0, 0, 0, 0]),
            10,
            12,
            Player::Ai,
        );
        assert_eq!(game.human_wallet(), 12);
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_majority_wallet_wins_immediately() {
        // 3 shells per pit: 42 in play, so 22 is a strict majority
        let board = Board::from_rows([1, 1, 1, 1, 1, 1, 1], [1, 1, 1, 1, 1, 1, 1]);
        let game = GameState::from_position(board, 22, 6, Player::Human);
        assert_eq!(game.total_shells(), 42);
        assert_eq!(game.result(), GameResult::HumanWins);
        assert_eq!(game.end_reason(), Some(EndReason::Majority));
        // Rows are not swept on a majority win
        assert_eq!(game.board().total(), 14);

        let game = GameState::from_position(board, 6, 21, Player::Human);
        assert_eq!(game.total_shells(), 41);
        assert_eq!(game.result(), GameResult::AiWins);

        let game = GameState::from_position(board, 0, 14, Player::Human);
        assert_eq!(game.total_shells(), 28);
        assert_eq!(game.result(), GameResult::Ongoing);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut game = GameState::from_position(Board::from_rows([3; 7], [0; 7]), 0, 0, Player::Human);
        assert!(game.result().is_over());
        assert!(game.legal_pits().is_empty());
        assert_eq!(game.play(0).unwrap_err(), GameError::GameOver);
    }

    #[test]
    fn test_endless_relay_pits_are_not_legal() {
        let board = Board::from_rows([2, 1, 0, 1, 0, 1, 0], [1, 0, 1, 2, 1, 0, 1]);
        assert_eq!(playable_pits(&board, Player::Ai), vec![1, 3, 5]);
        assert_eq!(playable_pits(&board, Player::Human), vec![0, 2, 4, 6]);

        let game = GameState::from_position(board, 0, 0, Player::Ai);
        assert!(!game.is_legal_move(Player::Ai.row(), 0));
        assert_eq!(game.legal_pits(), vec![1, 3, 5]);
    }

    #[test]
    fn test_conservation_over_random_games() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let mut game = GameState::default();
            while !game.result().is_over() && game.moves_played() < 400 {
                let pits = game.legal_pits();
                let pit = *pits.choose(&mut rng).unwrap();
                let report = game.play(pit).unwrap();
                assert!(conserved(&game), "shells leaked after {:?}", report);
            }
        }
    }

    #[test]
    fn test_ongoing_position_always_has_a_move() {
        use rand::Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..5_000 {
            let mut rows = [[0u32; PITS_PER_ROW]; 2];
            for pit in rows.iter_mut().flatten() {
                if rng.gen_bool(0.6) {
                    *pit = rng.gen_range(1..=4);
                }
            }
            let to_move = if rng.gen_bool(0.5) { Player::Human } else { Player::Ai };
            let state = GameState::from_position(Board::from_rows(rows[0], rows[1]), 0, 0, to_move);

            if state.result() == GameResult::Ongoing {
                assert!(!state.legal_pits().is_empty(), "stuck position {:?}", state.board());
            }
            if state.end_reason() == Some(EndReason::NoPlayablePit) {
                assert_eq!(state.board().total(), 0);
                assert!(conserved(&state));
            }
        }
    }

    #[test]
    fn test_describe_messages() {
        let mut game = GameState::default();
        let report = game.play(3).unwrap();
        assert_eq!(report.display_pit(), 4);
        assert_eq!(report.describe(), "You played pit 4. AI's move.");
    }
}
