//! Flatgo: a flat Monte Carlo Go engine.
//!
//! ## Usage
//!
//! - `flatgo` - Show a demo
//! - `flatgo gtp` - Start GTP server for GUI integration
//! - `flatgo demo` - Run the rollout demo
//!
//! Set `RUST_LOG=debug` to see per-move statistics on stderr.

use std::io;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use flatgo::ai::Ai;
use flatgo::color::Color;
use flatgo::config::EngineConfig;
use flatgo::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_KOMI, DEFAULT_MAX_TREE_DEPTH, DEFAULT_THINKING_TIME, MAX_BOARD_SIZE,
    MIN_BOARD_SIZE,
};
use flatgo::coord::format_vertex;
use flatgo::gtp::GtpEngine;

/// Flatgo: a flat Monte Carlo Go engine
#[derive(Parser)]
#[command(name = "flatgo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp(EngineArgs),
    /// Run a simple demo of the engine
    Demo(EngineArgs),
}

#[derive(Args)]
struct EngineArgs {
    /// Board size
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, value_parser = parse_board_size)]
    size: usize,
    /// Komi for White
    #[arg(long, default_value_t = DEFAULT_KOMI)]
    komi: f64,
    /// Rollout worker threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Thinking time per generated move, in milliseconds
    #[arg(long, default_value_t = DEFAULT_THINKING_TIME.as_millis() as u64)]
    think_ms: u64,
    /// Tree depth in plies (0 for unlimited)
    #[arg(long, default_value_t = DEFAULT_MAX_TREE_DEPTH)]
    tree_depth: usize,
    /// Seed for the rollout random number generators
    #[arg(long)]
    seed: Option<u64>,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        let mut config = EngineConfig::default()
            .with_board_size(self.size)
            .with_komi(self.komi)
            .with_thinking_time(Duration::from_millis(self.think_ms))
            .with_max_tree_depth(self.tree_depth);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp(args)) => {
            let mut engine = GtpEngine::new(args.config());
            engine.run(io::stdin().lock(), io::stdout())?;
        }
        Some(Commands::Demo(args)) => run_demo(args.config()),
        None => run_demo(EngineConfig::default().with_thinking_time(Duration::from_millis(500))),
    }
    Ok(())
}

fn parse_board_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("board size must be between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE}"))
    }
}

fn run_demo(config: EngineConfig) {
    println!("Flatgo: flat Monte Carlo Go engine\n");

    let budget = config.thinking_time;
    let mut ai = Ai::new(config);
    let mut color = Color::Black;

    for _ in 0..4 {
        let mv = ai.generate_move(color, budget);
        let text = ai
            .move_xy(mv)
            .map_or_else(|| "pass".to_string(), |(x, y)| format_vertex(x, y));
        println!("{color} plays {text} ({} rollouts so far)", ai.completed_rollouts());
        color = color.opposite();
    }
    ai.stop_thinking();

    println!("\n{}", ai.board());
    for (mv, stats) in ai.root_children().iter().take(5) {
        let text = ai
            .move_xy(*mv)
            .map_or_else(|| "pass".to_string(), |(x, y)| format_vertex(x, y));
        println!(
            "{text:>5}: sims={} winrate({color})={:.1}%",
            stats.simulations,
            stats.winrate(color) * 100.0
        );
    }
}
