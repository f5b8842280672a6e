//! Alpha-Beta AI
//!
//! The AI only looks at captured shells: a position is worth
//! `ai_wallet - human_wallet`. Even plies are AI moves (maximizing), odd
//! plies human moves (minimizing). Moves are tried in ascending pit order
//! and ties keep the first pit found.

use crate::board::{Board, PitRef, Player};
use crate::game::GameState;
use crate::rules::play_pit;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Plies searched when no depth is configured
pub const DEFAULT_SEARCH_DEPTH: u32 = 6;

/// Deepest search a config may ask for (branching is up to 7 per ply)
pub const MAX_SEARCH_DEPTH: u32 = 12;

/// Score bound used as infinity for the root window
pub const SCORE_INFINITY: i32 = i32::MAX;

/// Player acting at a given ply of the search
pub fn acting_player(depth: u32) -> Player {
    if depth % 2 == 0 {
        Player::Ai
    } else {
        Player::Human
    }
}

fn wallet_score(human_wallet: u32, ai_wallet: u32) -> i32 {
    ai_wallet as i32 - human_wallet as i32
}

/// Play `pit` for `player` on a copy, crediting the capture to that player
fn expand(
    board: &Board,
    player: Player,
    pit: usize,
    human_wallet: u32,
    ai_wallet: u32,
) -> Option<(Board, u32, u32)> {
    let mut child = *board;
    match play_pit(&mut child, PitRef::new(player, pit)) {
        Ok(turn) => Some(match player {
            Player::Human => (child, human_wallet + turn.captured, ai_wallet),
            Player::Ai => (child, human_wallet, ai_wallet + turn.captured),
        }),
        Err(err) => {
            tracing::trace!("skipping {} pit {}: {}", player, pit, err);
            None
        }
    }
}

// ============================================================================
// GAME TREE
// ============================================================================

/// A node of a materialized search tree
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub board: Board,
    pub human_wallet: u32,
    pub ai_wallet: u32,
    pub depth: u32,
    /// Pit played to reach this node (`None` at the root)
    pub pit: Option<usize>,
    pub children: Vec<SearchNode>,
}

impl SearchNode {
    /// Leaf value: wallet differential from the AI's side
    pub fn score(&self) -> i32 {
        wallet_score(self.human_wallet, self.ai_wallet)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn acting_player(&self) -> Player {
        acting_player(self.depth)
    }

    /// Nodes in this subtree, including itself
    pub fn node_count(&self) -> u64 {
        1 + self.children.iter().map(SearchNode::node_count).sum::<u64>()
    }
}

/// Build the full game tree below a position down to `max_depth`.
///
/// One child per playable pit of the acting row, in ascending pit order. A
/// node with no playable pit is a leaf regardless of depth.
pub fn build_tree(
    board: &Board,
    current_depth: u32,
    max_depth: u32,
    parent_pit: Option<usize>,
    human_wallet: u32,
    ai_wallet: u32,
) -> SearchNode {
    let mut node = SearchNode {
        board: *board,
        human_wallet,
        ai_wallet,
        depth: current_depth,
        pit: parent_pit,
        children: Vec::new(),
    };

    if current_depth >= max_depth {
        return node;
    }

    let player = acting_player(current_depth);
    for pit in board.occupied_pits(player) {
        if let Some((child, hw, aw)) = expand(board, player, pit, human_wallet, ai_wallet) {
            node.children
                .push(build_tree(&child, current_depth + 1, max_depth, Some(pit), hw, aw));
        }
    }

    node
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Alpha-beta over a materialized tree, returning the score and the pit of
/// the chosen child (`None` at a leaf)
pub fn alpha_beta(node: &SearchNode, mut alpha: i32, mut beta: i32, maximizing: bool) -> (i32, Option<usize>) {
    if node.is_leaf() {
        return (node.score(), None);
    }

    let mut best_pit = None;

    if maximizing {
        let mut best = i32::MIN;
        for child in &node.children {
            let (score, _) = alpha_beta(child, alpha, beta, false);
            if score > best {
                best = score;
                best_pit = child.pit;
            }
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        (best, best_pit)
    } else {
        let mut best = i32::MAX;
        for child in &node.children {
            let (score, _) = alpha_beta(child, alpha, beta, true);
            if score < best {
                best = score;
                best_pit = child.pit;
            }
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        (best, best_pit)
    }
}

/// Plain minimax over a materialized tree (reference for alpha-beta)
pub fn minimax(node: &SearchNode, maximizing: bool) -> (i32, Option<usize>) {
    if node.is_leaf() {
        return (node.score(), None);
    }

    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    let mut best_pit = None;
    for child in &node.children {
        let (score, _) = minimax(child, !maximizing);
        let better = if maximizing { score > best } else { score < best };
        if better {
            best = score;
            best_pit = child.pit;
        }
    }
    (best, best_pit)
}

// ============================================================================
// FOLDED SEARCH
// ============================================================================

/// Outcome of a search from the AI's side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_pit: Option<usize>,
    pub score: i32,
    pub nodes: u64,
    pub depth: u32,
}

/// Depth-first alpha-beta that generates and scores children on the fly.
///
/// Same move order, pruning and result as [`build_tree`] + [`alpha_beta`],
/// without keeping the tree.
pub fn search(board: &Board, human_wallet: u32, ai_wallet: u32, max_depth: u32) -> SearchResult {
    let mut nodes = 0;
    let (score, best_pit) = search_node(
        board,
        0,
        max_depth,
        human_wallet,
        ai_wallet,
        -SCORE_INFINITY,
        SCORE_INFINITY,
        &mut nodes,
    );

    SearchResult {
        best_pit,
        score,
        nodes,
        depth: max_depth,
    }
}

#[allow(clippy::too_many_arguments)]
fn search_node(
    board: &Board,
    depth: u32,
    max_depth: u32,
    human_wallet: u32,
    ai_wallet: u32,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
) -> (i32, Option<usize>) {
    *nodes += 1;
    let leaf_score = wallet_score(human_wallet, ai_wallet);

    if depth >= max_depth {
        return (leaf_score, None);
    }

    let player = acting_player(depth);
    let maximizing = player == Player::Ai;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    let mut best_pit = None;
    let mut any_child = false;

    for pit in board.occupied_pits(player) {
        let Some((child, hw, aw)) = expand(board, player, pit, human_wallet, ai_wallet) else {
            continue;
        };
        any_child = true;

        let (score, _) = search_node(&child, depth + 1, max_depth, hw, aw, alpha, beta, nodes);

        if maximizing {
            if score > best {
                best = score;
                best_pit = Some(pit);
            }
            alpha = alpha.max(best);
        } else {
            if score < best {
                best = score;
                best_pit = Some(pit);
            }
            beta = beta.min(best);
        }

        if beta <= alpha {
            break;
        }
    }

    if !any_child {
        return (leaf_score, None);
    }

    (best, best_pit)
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player (always plays the AI row)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaBetaAI {
    pub depth: u32,
}

impl AlphaBetaAI {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    /// Search the position as if the AI were to move
    pub fn search(&self, state: &GameState) -> SearchResult {
        search(state.board(), state.human_wallet(), state.ai_wallet(), self.depth)
    }

    /// Best pit for the AI, or `None` when it has no move
    pub fn best_move(&self, state: &GameState) -> Option<usize> {
        if state.result().is_over() || state.current_player() != Player::Ai {
            return None;
        }

        let result = self.search(state);
        tracing::debug!(
            "AI search depth {}: pit {:?}, score {}, {} nodes",
            result.depth,
            result.best_pit,
            result.score,
            result.nodes
        );
        result.best_pit
    }

    /// Materialize the tree this AI would search
    pub fn build_tree(&self, state: &GameState) -> SearchNode {
        build_tree(state.board(), 0, self.depth, None, state.human_wallet(), state.ai_wallet())
    }
}

impl Default for AlphaBetaAI {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEPTH)
    }
}

// ============================================================================
// TESTS
// ============================================================================
