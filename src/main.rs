mod app;
mod headless;

use anyhow::Result;
use clap::Parser;
use log::info;
use nqueens_visualizer::{Algorithm, BoardSize, Config, Speed};

/// Watch backtracking search solve the N-Queens puzzle one step at a time.
#[derive(Parser, Debug)]
#[command(name = "nqueens", version)]
struct Cli {
    /// Number of queens, 4 to 16
    #[arg(short = 'n', long, default_value = "8")]
    size: BoardSize,

    /// Search strategy: dfs or csp
    #[arg(short, long, default_value = "csp")]
    algorithm: Algorithm,

    /// Delay per step in ms: 1000, 500, 250, 100, 10 or 1
    #[arg(short, long, default_value = "500")]
    speed: Speed,

    /// Print steps to the terminal instead of opening a window
    #[arg(long)]
    headless: bool,

    /// With --headless, print one JSON object per step
    #[arg(long, requires = "headless")]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let cli = Cli::parse();
    let config = Config {
        size: cli.size,
        algorithm: cli.algorithm,
        speed: cli.speed,
    };
    info!(
        "n={} algorithm={} speed={}",
        config.size, config.algorithm, config.speed
    );

    if cli.headless {
        headless::run(config, cli.json)
    } else {
        app::run(config)
    }
}
