//! Play command - a human-vs-AI game in the terminal
//!
//! The human sows from the bottom row, entering pits as 1-7.

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Args;

use pallanguzhi_core::{GameConfig, GameResult, Player, Session, PITS_PER_ROW};

#[derive(Args)]
pub struct PlayArgs {
    /// AI search depth (overrides the config file)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Shells per pit at the start (overrides the config file)
    #[arg(long)]
    pub shells: Option<u32>,

    /// Let the AI make the first move
    #[arg(long)]
    pub ai_first: bool,
}

/// Run play command on stdin/stdout
pub fn run(args: PlayArgs, config: GameConfig) -> Result<()> {
    let mut config = crate::apply_overrides(config, args.depth, args.shells)?;
    if args.ai_first {
        config.first_player = Player::Ai;
    }

    let mut session = Session::new(config)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play_game(&mut session, stdin.lock(), stdout.lock())?;
    Ok(())
}

/// Drive a game until it ends or input runs out
pub fn play_game<R: BufRead, W: Write>(session: &mut Session, mut input: R, mut out: W) -> Result<GameResult> {
    writeln!(out, "Pallanguzhi: you sow from the bottom row. Enter a pit 1-{}, or q to quit.", PITS_PER_ROW)?;

    loop {
        render(session, &mut out)?;

        if session.state().result().is_over() {
            break;
        }

        if session.state().current_player() == Player::Ai {
            let report = session.play_ai_move()?;
            writeln!(out, "{}", report.describe())?;
            continue;
        }

        write!(out, "Your move: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(session.state().result());
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            writeln!(out, "Quitting.")?;
            return Ok(session.state().result());
        }

        let pit = match line.parse::<usize>() {
            Ok(n) if (1..=PITS_PER_ROW).contains(&n) => n - 1,
            _ => {
                writeln!(out, "Enter a pit number from 1 to {}.", PITS_PER_ROW)?;
                continue;
            }
        };

        if !session.is_legal_move(Player::Human.row(), pit) {
            let legal: Vec<String> = session.legal_pits().iter().map(|p| (p + 1).to_string()).collect();
            writeln!(out, "Pit {} is not a legal move (legal: {}).", pit + 1, legal.join(", "))?;
            continue;
        }

        let report = session.choose_move(Player::Human.row(), pit)?;
        writeln!(out, "{}", report.describe())?;
    }

    let state = session.state();
    let verdict = match state.result().winner() {
        Some(Player::Human) => "You win!",
        Some(Player::Ai) => "AI wins.",
        None if state.result() == GameResult::Draw => "Draw.",
        None => "Unfinished.",
    };
    writeln!(
        out,
        "Game over: {} Final wallets: you {}, AI {}",
        verdict,
        state.human_wallet(),
        state.ai_wallet()
    )?;

    Ok(state.result())
}

fn render<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let state = session.state();
    let board = state.board();

    let row_text = |player: Player| {
        board
            .row(player)
            .iter()
            .map(|n| format!("{:>3}", n))
            .collect::<String>()
    };

    writeln!(out)?;
    writeln!(out, "AI   [{} ]  wallet {}", row_text(Player::Ai), state.ai_wallet())?;
    writeln!(out, "You  [{} ]  wallet {}", row_text(Player::Human), state.human_wallet())?;
    let labels: String = (1..=PITS_PER_ROW).map(|n| format!("{:>3}", n)).collect();
    writeln!(out, "      {}", labels)?;
    Ok(())
}
