//! Random self-play CLI.
//!
//! Plays whole games with random legal moves and prints one JSON summary
//! per game, followed by aggregate statistics on stderr.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- --games 100 --seats 4

use std::time::Instant;

use clap::Parser;

use rust_ludo::core::RulesConfig;
use rust_ludo::selfplay::{self, SelfPlayConfig};

#[derive(Parser, Debug)]
#[command(name = "selfplay", about = "Play random Ludo games and report how they went")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u64,

    /// Seats per game (2-4)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=4))]
    seats: u8,

    /// Base random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Abandon a game after this many commands
    #[arg(long, default_value_t = 20_000)]
    max_commands: usize,

    /// Let a player roll again after moving on a 6
    #[arg(long)]
    extra_turn_on_six: bool,

    /// Rule variants as a JSON file; flags above override it
    #[arg(long)]
    rules: Option<std::path::PathBuf>,

    /// Only print the aggregate line
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut rules = match &args.rules {
        Some(path) => RulesConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => RulesConfig::default(),
    };
    if args.extra_turn_on_six {
        rules = rules.with_extra_turn_on_six(true);
    }

    let config = SelfPlayConfig::new()
        .with_seats(usize::from(args.seats))
        .with_seed(args.seed)
        .with_max_commands(args.max_commands)
        .with_rules(rules);

    let start = Instant::now();
    let summaries = selfplay::run(&config, args.games)?;
    let elapsed = start.elapsed();

    if !args.quiet {
        for summary in &summaries {
            println!("{}", serde_json::to_string(summary)?);
        }
    }

    let finished = summaries.iter().filter(|s| s.winner.is_some()).count();
    let turns: u64 = summaries.iter().map(|s| u64::from(s.turns)).sum();
    let captures: usize = summaries.iter().map(|s| s.captures).sum();
    let games = summaries.len().max(1) as f64;
    eprintln!(
        "{} games ({} finished) in {:.2?}: {:.1} turns/game, {:.1} captures/game",
        summaries.len(),
        finished,
        elapsed,
        turns as f64 / games,
        captures as f64 / games,
    );
    Ok(())
}
