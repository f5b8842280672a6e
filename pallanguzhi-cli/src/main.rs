//! Pallanguzhi CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game against the AI in the terminal
//! - match: Pit the AI against a baseline opponent
//! - serve: Start the HTTP server

mod match_cmd;
mod play;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pallanguzhi_core::GameConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pallanguzhi")]
#[command(about = "Pallanguzhi sowing game with an alpha-beta AI")]
#[command(version)]
struct Cli {
    /// Game config JSON file (defaults are used when omitted)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the AI in the terminal
    Play(play::PlayArgs),
    /// Play the AI against a baseline opponent
    Match(match_cmd::MatchArgs),
    /// Start the HTTP server
    Serve(server::ServerArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play(args) => play::run(args, config),
        Commands::Match(args) => match_cmd::run(args, config, cli.seed),
        Commands::Serve(args) => server::run(args, config),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load game config: {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Apply command-line overrides on top of the file config
pub(crate) fn apply_overrides(
    mut config: GameConfig,
    depth: Option<u32>,
    shells: Option<u32>,
) -> Result<GameConfig> {
    if let Some(depth) = depth {
        config.search_depth = depth;
    }
    if let Some(shells) = shells {
        config.shells_per_pit = shells;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["pallanguzhi", "match", "--games", "4", "--opponent", "greedy"]).unwrap();
        assert!(matches!(cli.command, Commands::Match(_)));

        let cli = Cli::try_parse_from(["pallanguzhi", "play", "--depth", "3", "--seed", "7"]).unwrap();
        assert_eq!(cli.seed, Some(7));
        assert!(matches!(cli.command, Commands::Play(_)));
    }

    #[test]
    fn test_apply_overrides() {
        let config = apply_overrides(GameConfig::default(), Some(3), Some(4)).unwrap();
        assert_eq!(config.search_depth, 3);
        assert_eq!(config.shells_per_pit, 4);

        let unchanged = apply_overrides(GameConfig::default(), None, None).unwrap();
        assert_eq!(unchanged, GameConfig::default());

        assert!(apply_overrides(GameConfig::default(), Some(0), None).is_err());
    }

    #[test]
    fn test_load_config_default() {
        assert_eq!(load_config(None).unwrap(), GameConfig::default());
        assert!(load_config(Some(Path::new("/nonexistent/config.json"))).is_err());
    }
}
