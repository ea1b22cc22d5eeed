use anyhow::Context as _;
use log::{error, info};
use nqueens_visualizer::{Board, Config, Outcome, RunController, Step, StepSink};
use std::sync::Arc;

/// Prints each step to stdout, as a text board or one JSON object per line.
struct ConsoleSink {
    json: bool,
}

impl StepSink for ConsoleSink {
    fn publish(&self, step: &Step) {
        if self.json {
            match serde_json::to_string(step) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("failed to encode step {}: {e}", step.number),
            }
        } else {
            println!("#{:<5} {}", step.number, step.message);
            print!("{}", render(&step.board));
        }
    }
}

fn render(board: &Board) -> String {
    let mut out = String::new();
    for row in board.rows() {
        out.push_str("       ");
        for &queen in row {
            out.push_str(if queen { " Q" } else { " ." });
        }
        out.push('\n');
    }
    out
}

/// Solves once on a current-thread runtime and prints a summary.
pub fn run(config: Config, json: bool) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start the search runtime")?;

    let sink = Arc::new(ConsoleSink { json });
    let mut controller = RunController::new(config, runtime.handle().clone(), sink);
    controller.start()?;
    let outcome = runtime
        .block_on(controller.join())
        .context("search task ended without an outcome")?;

    let status = controller.status();
    let queens: Vec<_> = status
        .board
        .queens()
        .map(|(r, c)| (r + 1, c + 1))
        .collect();
    if json {
        let summary = serde_json::json!({
            "outcome": outcome,
            "steps": status.step_count,
            "message": status.message,
            "queens": queens,
        });
        println!("{summary}");
    } else {
        println!("{} ({} steps)", status.message, status.step_count);
    }

    match outcome {
        Outcome::Solved => info!("solution verified: {}", status.board.is_solution()),
        Outcome::Exhausted => info!("n={} has no solution", config.size),
        Outcome::Cancelled => info!("run cancelled"),
    }
    Ok(())
}
