//! Match command - play the AI against a baseline opponent
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: opponents, formatting utilities

use anyhow::Result;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use pallanguzhi_core::{AlphaBetaAI, GameConfig, GameResult, GameState, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Baseline strategy playing the human row
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Opponent {
    /// Uniformly random legal pit
    Random,
    /// Pit with the largest immediate capture
    Greedy,
}

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play (alternates who moves first)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// AI search depth (overrides the config file)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Shells per pit at the start (overrides the config file)
    #[arg(long)]
    pub shells: Option<u32>,

    /// Baseline opponent
    #[arg(long, value_enum, default_value = "random")]
    pub opponent: Opponent,

    /// Maximum moves per game before it is scored as unfinished
    #[arg(long, default_value = "500")]
    pub max_moves: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    first_player: Player,
    result: GameResult,
    moves: u32,
    ai_wallet: u32,
    opponent_wallet: u32,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    ai_wins: usize,
    opponent_wins: usize,
    draws: usize,
    unfinished: usize,
    avg_moves: f32,
    avg_margin: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the game config
/// 2. Play the match (games in parallel)
/// 3. Report results
pub fn run(args: MatchArgs, config: GameConfig, seed: Option<u64>) -> Result<()> {
    let config = crate::apply_overrides(config, args.depth, args.shells)?;

    tracing::info!(
        "Starting match: AI (depth {}) vs {:?} ({} games)",
        config.search_depth,
        args.opponent,
        args.games
    );

    let results = play_match(&config, &args, seed);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in parallel using rayon
fn play_match(config: &GameConfig, args: &MatchArgs, seed: Option<u64>) -> MatchResults {
    let base_seed = seed.unwrap_or_else(rand::random);
    let progress = create_progress_bar(args.games as u64, args.json);

    let mut games: Vec<GameRecord> = (0..args.games)
        .into_par_iter()
        .map(|index| {
            let first = if index % 2 == 0 { Player::Human } else { Player::Ai };
            let game_config = config.clone().with_first_player(first);
            let record = play_single_game(
                &game_config,
                args.opponent,
                index + 1,
                args.max_moves,
                base_seed.wrapping_add(index as u64),
            );
            progress.inc(1);
            record
        })
        .collect();

    progress.finish_and_clear();
    games.sort_by_key(|g| g.game_number);

    for record in &games {
        tracing::debug!(
            "Game {}: {:?} in {} moves (AI {} - {})",
            record.game_number,
            record.result,
            record.moves,
            record.ai_wallet,
            record.opponent_wallet
        );
    }

    compute_match_statistics(games)
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results, args.opponent);
    } else {
        print_text_results(results, args.opponent);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game: the AI on row 0, the opponent on row 1
fn play_single_game(
    config: &GameConfig,
    opponent: Opponent,
    game_number: usize,
    max_moves: u32,
    seed: u64,
) -> GameRecord {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ai = config.ai();
    let mut state = config.initial_state();

    while !state.result().is_over() && state.moves_played() < max_moves {
        let pit = match state.current_player() {
            Player::Ai => ai.best_move(&state),
            Player::Human => opponent_move(&state, opponent, &mut rng),
        };
        let Some(pit) = pit else {
            break;
        };
        if let Err(err) = state.play(pit) {
            tracing::warn!("Game {}: move {} rejected: {}", game_number, pit, err);
            break;
        }
    }

    GameRecord {
        game_number,
        first_player: config.first_player,
        result: state.result(),
        moves: state.moves_played(),
        ai_wallet: state.ai_wallet(),
        opponent_wallet: state.human_wallet(),
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let ai_wins = count(GameResult::AiWins);
    let opponent_wins = count(GameResult::HumanWins);
    let draws = count(GameResult::Draw);
    let unfinished = count(GameResult::Ongoing);

    let (avg_moves, avg_margin) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let total_moves: u32 = games.iter().map(|g| g.moves).sum();
        let total_margin: i64 = games
            .iter()
            .map(|g| g.ai_wallet as i64 - g.opponent_wallet as i64)
            .sum();
        (
            total_moves as f32 / games.len() as f32,
            total_margin as f32 / games.len() as f32,
        )
    };

    MatchResults {
        games,
        ai_wins,
        opponent_wins,
        draws,
        unfinished,
        avg_moves,
        avg_margin,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Pick a pit for the baseline opponent
fn opponent_move(state: &GameState, opponent: Opponent, rng: &mut ChaCha8Rng) -> Option<usize> {
    let legal = state.legal_pits();
    match opponent {
        Opponent::Random => legal.choose(rng).copied(),
        Opponent::Greedy => {
            let mut best: Option<(usize, u32)> = None;
            for pit in legal {
                let Ok((_, report)) = state.apply_move(pit) else {
                    continue;
                };
                if best.map_or(true, |(_, captured)| report.captured > captured) {
                    best = Some((pit, report.captured));
                }
            }
            best.map(|(pit, _)| pit)
        }
    }
}

fn create_progress_bar(len: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})") {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, opponent: Opponent) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        first_player: Player,
        result: GameResult,
        moves: u32,
        ai_wallet: u32,
        opponent_wallet: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        opponent: String,
        total_games: usize,
        ai_wins: usize,
        opponent_wins: usize,
        draws: usize,
        unfinished: usize,
        avg_moves: f32,
        avg_margin: f32,
        ai_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        opponent: format!("{:?}", opponent).to_lowercase(),
        total_games: total,
        ai_wins: results.ai_wins,
        opponent_wins: results.opponent_wins,
        draws: results.draws,
        unfinished: results.unfinished,
        avg_moves: results.avg_moves,
        avg_margin: results.avg_margin,
        ai_win_rate: percent(results.ai_wins, total) / 100.0,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                first_player: g.first_player,
                result: g.result,
                moves: g.moves,
                ai_wallet: g.ai_wallet,
                opponent_wallet: g.opponent_wallet,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, opponent: Opponent) {
    let total = results.games.len();

    println!("\n=== Match Results: AI vs {:?} ===", opponent);
    println!("Total games:    {}", total);
    println!("AI wins:        {} ({:.1}%)", results.ai_wins, percent(results.ai_wins, total));
    println!(
        "Opponent wins:  {} ({:.1}%)",
        results.opponent_wins,
        percent(results.opponent_wins, total)
    );
    println!("Draws:          {} ({:.1}%)", results.draws, percent(results.draws, total));
    if results.unfinished > 0 {
        println!("Unfinished:     {}", results.unfinished);
    }
    println!("Avg moves:      {:.1}", results.avg_moves);
    println!("Avg margin:     {:+.1}", results.avg_margin);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} ({} first): {:?} in {} moves, {} - {}",
            game.game_number, game.first_player, game.result, game.moves, game.ai_wallet, game.opponent_wallet
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pallanguzhi_core::Board;

    fn record(game_number: usize, result: GameResult, moves: u32, ai_wallet: u32, opponent_wallet: u32) -> GameRecord {
        GameRecord {
            game_number,
            first_player: Player::Human,
            result,
            moves,
            ai_wallet,
            opponent_wallet,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.ai_wins, 0);
        assert_eq!(results.opponent_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, GameResult::AiWins, 10, 50, 34),
            record(2, GameResult::HumanWins, 20, 30, 54),
            record(3, GameResult::AiWins, 30, 44, 40),
            record(4, GameResult::Draw, 40, 42, 42),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.ai_wins, 2);
        assert_eq!(results.opponent_wins, 1);
        assert_eq!(results.draws, 1);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_moves, 25.0);
        assert_eq!(results.avg_margin, -1.0);
    }

    #[test]
    fn test_greedy_takes_largest_capture() {
        // Human pit 0 sows into ai 0 and 1, lands on ai 2 and captures ai 3
        let board = Board::from_rows([0, 0, 0, 9, 0, 0, 1], [2, 0, 0, 0, 0, 0, 1]);
        let state = GameState::from_position(board, 0, 0, Player::Human);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(opponent_move(&state, Opponent::Greedy, &mut rng), Some(0));
    }

    #[test]
    fn test_random_opponent_is_legal_and_seeded() {
        let state = GameState::default();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..20 {
            let pit = opponent_move(&state, Opponent::Random, &mut a);
            assert_eq!(pit, opponent_move(&state, Opponent::Random, &mut b));
            assert!(state.legal_pits().contains(&pit.unwrap()));
        }
    }

    #[test]
    fn test_single_game_finishes() {
        let config = GameConfig::default().with_depth(2);
        for opponent in [Opponent::Random, Opponent::Greedy] {
            let record = play_single_game(&config, opponent, 1, 500, 7);
            assert!(record.result.is_over());
            assert!(record.moves > 0);
        }
    }

    #[test]
    fn test_max_moves_stops_game() {
        let config = GameConfig::default().with_depth(1);
        let record = play_single_game(&config, Opponent::Random, 1, 1, 3);
        assert_eq!(record.moves, 1);
        assert_eq!(record.result, GameResult::Ongoing);
    }
}
