//! The two animated backtracking searches.
//!
//! Both stop at the first solution and leave it on the board. Every
//! placement and removal is published through the [`StepEmitter`] before the
//! search moves on, and a `false` from the emitter unwinds the whole
//! recursion without further mutation.

pub mod csp;
pub mod dfs;

use crate::config::Algorithm;
use crate::emitter::StepEmitter;
use crate::run::{Outcome, NO_SOLUTION_MESSAGE};

pub const SOLUTION_MESSAGE: &str = "✅ Solution found!";

pub(crate) fn backtrack_message(row: usize, col: usize) -> String {
    format!("Backtracking from Row {}, Column {}", row + 1, col + 1)
}

/// Runs `algorithm` on an `n`x`n` board until it finds a solution, exhausts
/// the search, or is cancelled.
pub async fn solve(algorithm: Algorithm, n: usize, emitter: &mut StepEmitter) -> Outcome {
    let found = match algorithm {
        Algorithm::Dfs => dfs::solve(n, emitter).await,
        Algorithm::Csp => csp::solve(n, emitter).await,
    };
    if found && !emitter.is_cancelled() {
        log::debug!("{algorithm} found a solution for n={n}");
        Outcome::Solved
    } else if emitter.is_cancelled() {
        Outcome::Cancelled
    } else if emitter.report(NO_SOLUTION_MESSAGE) {
        log::debug!("{algorithm} exhausted the search for n={n}");
        Outcome::Exhausted
    } else {
        // Replaced by a newer run between the last step and now.
        Outcome::Cancelled
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::emitter::{Step, StepEmitter, StepSink};
    use crate::run::{self, RunHandle, RunStatus, Shared, SharedStatus};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    pub struct Trace(pub Mutex<Vec<Step>>);

    impl Trace {
        pub fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().iter().map(|s| s.message.clone()).collect()
        }

        pub fn last(&self) -> Option<Step> {
            self.0.lock().unwrap().last().cloned()
        }
    }

    impl StepSink for Trace {
        fn publish(&self, step: &Step) {
            self.0.lock().unwrap().push(step.clone());
        }
    }

    pub struct Harness {
        pub emitter: StepEmitter,
        pub handle: RunHandle,
        pub trace: Arc<Trace>,
        pub shared: SharedStatus,
    }

    impl Harness {
        /// Emitter with no delay wired to a recording sink.
        pub fn new(n: usize) -> Self {
            let (handle, ctx) = run::channel(1);
            let shared = Arc::new(Mutex::new(Shared {
                status: RunStatus::ready(n),
                current: 1,
            }));
            let trace = Arc::new(Trace::default());
            let emitter = StepEmitter::new(ctx, Duration::ZERO, shared.clone(), trace.clone());
            Self {
                emitter,
                handle,
                trace,
                shared,
            }
        }

        pub fn status_message(&self) -> String {
            run::lock(&self.shared).status.message.clone()
        }
    }
}
