//! Board geometry: two rows of seven pits on a single sowing cycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pits in each player's row
pub const PITS_PER_ROW: usize = 7;

/// Number of rows (one per player)
pub const ROWS: usize = 2;

/// Pits on the whole board
pub const TOTAL_PITS: usize = PITS_PER_ROW * ROWS;

/// Shells per pit in the standard opening
pub const DEFAULT_SHELLS_PER_PIT: u32 = 6;

/// Player identity, mapped once to a board row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Ai,
    Human,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Ai, Player::Human];

    /// Row index owned by this player
    pub const fn row(self) -> usize {
        match self {
            Player::Ai => 0,
            Player::Human => 1,
        }
    }

    pub fn from_row(row: usize) -> Option<Self> {
        match row {
            0 => Some(Player::Ai),
            1 => Some(Player::Human),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::Ai => Player::Human,
            Player::Human => Player::Ai,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Ai => f.write_str("AI"),
            Player::Human => f.write_str("human"),
        }
    }
}

/// A single pit: owning row plus index within the row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitRef {
    pub player: Player,
    pub pit: usize,
}

impl PitRef {
    pub const fn new(player: Player, pit: usize) -> Self {
        Self { player, pit }
    }

    /// Next pit in the anti-clockwise sowing cycle.
    ///
    /// The AI row is walked left to right, the human row right to left:
    /// `human[0] -> ai[0] -> ... -> ai[6] -> human[6] -> ... -> human[0]`.
    pub fn next(self) -> Self {
        match (self.player, self.pit) {
            (Player::Human, 0) => PitRef::new(Player::Ai, 0),
            (Player::Ai, p) if p == PITS_PER_ROW - 1 => PitRef::new(Player::Human, PITS_PER_ROW - 1),
            (Player::Ai, p) => PitRef::new(Player::Ai, p + 1),
            (Player::Human, p) => PitRef::new(Player::Human, p - 1),
        }
    }

    /// Position along the cycle, starting at `human[0]`
    pub fn cycle_index(self) -> usize {
        match self.player {
            Player::Human if self.pit == 0 => 0,
            Player::Ai => 1 + self.pit,
            Player::Human => TOTAL_PITS - self.pit,
        }
    }
}

impl fmt::Display for PitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.player.row(), self.pit)
    }
}

/// The 14 pits in sowing order, starting at `human[0]`
pub fn cycle_order() -> Vec<PitRef> {
    let mut order = Vec::with_capacity(TOTAL_PITS);
    let mut pos = PitRef::new(Player::Human, 0);
    for _ in 0..TOTAL_PITS {
        order.push(pos);
        pos = pos.next();
    }
    order
}

/// Pit counts for both rows (copy to branch)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pits: [[u32; PITS_PER_ROW]; ROWS],
}

impl Board {
    /// Opening position with `shells` in every pit
    pub fn new(shells: u32) -> Self {
        Self {
            pits: [[shells; PITS_PER_ROW]; ROWS],
        }
    }

    pub fn from_rows(ai: [u32; PITS_PER_ROW], human: [u32; PITS_PER_ROW]) -> Self {
        let mut pits = [[0; PITS_PER_ROW]; ROWS];
        pits[Player::Ai.row()] = ai;
        pits[Player::Human.row()] = human;
        Self { pits }
    }

    pub fn get(&self, pos: PitRef) -> u32 {
        self.pits[pos.player.row()][pos.pit]
    }

    /// Empty a pit and return what it held
    pub fn take(&mut self, pos: PitRef) -> u32 {
        std::mem::take(&mut self.pits[pos.player.row()][pos.pit])
    }

    pub fn drop_one(&mut self, pos: PitRef) {
        self.pits[pos.player.row()][pos.pit] += 1;
    }

    pub fn row(&self, player: Player) -> &[u32; PITS_PER_ROW] {
        &self.pits[player.row()]
    }

    pub fn row_total(&self, player: Player) -> u32 {
        self.row(player).iter().sum()
    }

    pub fn row_is_empty(&self, player: Player) -> bool {
        self.row(player).iter().all(|&shells| shells == 0)
    }

    /// Empty a whole row, returning the shells removed
    pub fn clear_row(&mut self, player: Player) -> u32 {
        let total = self.row_total(player);
        self.pits[player.row()] = [0; PITS_PER_ROW];
        total
    }

    /// Shells still on the board
    pub fn total(&self) -> u32 {
        self.pits.iter().flatten().sum()
    }

    /// Non-empty pits of a row in ascending index order
    pub fn occupied_pits(&self, player: Player) -> impl Iterator<Item = usize> + '_ {
        self.row(player)
            .iter()
            .enumerate()
            .filter(|&(_, &shells)| shells > 0)
            .map(|(pit, _)| pit)
    }

    /// All 14 counts, row 0 first
    pub fn counts(&self) -> [u32; TOTAL_PITS] {
        let mut counts = [0; TOTAL_PITS];
        for (i, &shells) in self.pits.iter().flatten().enumerate() {
            counts[i] = shells;
        }
        counts
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SHELLS_PER_PIT)
    }
}
