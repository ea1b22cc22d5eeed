use crate::board::Board;
use crate::run::{self, Outcome, RunContext, SharedStatus};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::time::{sleep_until, Instant};

/// One observable mutation of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub number: u64,
    pub message: String,
    pub board: Board,
}

/// The presentation side of the engine.
///
/// `publish` is called with the status lock held, so implementations must
/// not call back into the [`RunController`](crate::RunController).
pub trait StepSink: Send + Sync {
    fn publish(&self, step: &Step);

    fn finished(&self, _outcome: Outcome) {}
}

/// Sink that drops everything; the shared status still updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StepSink for NullSink {
    fn publish(&self, _step: &Step) {}
}

/// Publishes steps for one run and suspends between them.
pub struct StepEmitter {
    ctx: RunContext,
    delay: Duration,
    shared: SharedStatus,
    sink: Arc<dyn StepSink>,
}

impl StepEmitter {
    pub(crate) fn new(
        ctx: RunContext,
        delay: Duration,
        shared: SharedStatus,
        sink: Arc<dyn StepSink>,
    ) -> Self {
        Self {
            ctx,
            delay,
            shared,
            sink,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.ctx.is_cancelled()
    }

    /// Publishes `board` with `message`, then waits out the delay.
    ///
    /// Returns `false` once the run is cancelled, in which case the caller
    /// must unwind without touching the board again.
    pub async fn step(&mut self, board: &Board, message: impl Into<String>) -> bool {
        if !self.publish(board, message.into()) {
            return false;
        }
        self.wait().await
    }

    /// Sets a status message without counting a step. Used for terminal
    /// reports such as exhaustion.
    pub(crate) fn report(&self, message: &str) -> bool {
        let mut shared = run::lock(&self.shared);
        if self.ctx.is_cancelled() || shared.current != self.ctx.id() {
            return false;
        }
        shared.status.message = message.to_owned();
        true
    }

    fn publish(&self, board: &Board, message: String) -> bool {
        // The controller cancels under this same lock, so nothing can be
        // published once stop() has returned.
        let mut shared = run::lock(&self.shared);
        if self.ctx.is_cancelled() || shared.current != self.ctx.id() {
            return false;
        }
        let status = &mut shared.status;
        status.step_count += 1;
        status.message.clone_from(&message);
        status.board = board.snapshot();

        let step = Step {
            number: status.step_count,
            message,
            board: status.board.snapshot(),
        };
        log::trace!("step {}: {}", step.number, step.message);
        self.sink.publish(&step);
        true
    }

    async fn wait(&mut self) -> bool {
        let deadline = Instant::now() + self.delay;
        loop {
            if self.ctx.is_cancelled() {
                return false;
            }
            tokio::select! {
                _ = sleep_until(deadline) => break,
                alive = self.ctx.changed() => {
                    if !alive {
                        return false;
                    }
                }
            }
        }
        // Delay is over; hold here for as long as the run stays paused.
        loop {
            if self.ctx.is_cancelled() {
                return false;
            }
            if !self.ctx.is_paused() {
                return true;
            }
            if !self.ctx.changed().await {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::{channel, RunStatus, Shared};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Step>>);

    impl StepSink for Recorder {
        fn publish(&self, step: &Step) {
            self.0.lock().unwrap().push(step.clone());
        }
    }

    fn shared(n: usize, current: u64) -> SharedStatus {
        Arc::new(Mutex::new(Shared {
            status: RunStatus::ready(n),
            current,
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_publishes_snapshot_and_counts() {
        let (_handle, ctx) = channel(1);
        let sink = Arc::new(Recorder::default());
        let status = shared(4, 1);
        let mut emitter = StepEmitter::new(
            ctx,
            Duration::from_millis(100),
            status.clone(),
            sink.clone(),
        );

        let mut board = Board::new(4);
        board.place(0, 0);
        assert!(emitter.step(&board, "first").await);
        board.place(1, 2);
        assert!(emitter.step(&board, "second").await);

        let steps = sink.0.lock().unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].number, 1);
        assert_eq!(steps[0].board.queens().count(), 1);
        assert_eq!(steps[1].number, 2);
        assert_eq!(steps[1].message, "second");

        let shared = run::lock(&status);
        assert_eq!(shared.status.step_count, 2);
        assert_eq!(shared.status.board, board);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_waits_for_the_delay() {
        let (_handle, ctx) = channel(1);
        let mut emitter = StepEmitter::new(
            ctx,
            Duration::from_millis(250),
            shared(4, 1),
            Arc::new(NullSink),
        );
        let start = Instant::now();
        assert!(emitter.step(&Board::new(4), "x").await);
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_publishes_nothing() {
        let (handle, ctx) = channel(1);
        let sink = Arc::new(Recorder::default());
        let mut emitter = StepEmitter::new(
            ctx,
            Duration::from_millis(10),
            shared(4, 1),
            sink.clone(),
        );
        handle.cancel();
        assert!(!emitter.step(&Board::new(4), "late").await);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_run_publishes_nothing() {
        let (_handle, ctx) = channel(1);
        let sink = Arc::new(Recorder::default());
        let mut emitter = StepEmitter::new(
            ctx,
            Duration::from_millis(10),
            shared(4, 2),
            sink.clone(),
        );
        assert!(!emitter.step(&Board::new(4), "old run").await);
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_cuts_the_wait_short() {
        let (handle, ctx) = channel(1);
        let mut emitter = StepEmitter::new(
            ctx,
            Duration::from_secs(60),
            shared(4, 1),
            Arc::new(NullSink),
        );
        let start = Instant::now();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
            handle
        });
        assert!(!emitter.step(&Board::new(4), "x").await);
        assert!(start.elapsed() < Duration::from_secs(60));
        canceller.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_holds_past_the_delay() {
        let (handle, ctx) = channel(1);
        let mut emitter = StepEmitter::new(
            ctx,
            Duration::from_millis(50),
            shared(4, 1),
            Arc::new(NullSink),
        );
        handle.set_paused(true);
        let start = Instant::now();
        let resumer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            handle.set_paused(false);
            handle
        });
        assert!(emitter.step(&Board::new(4), "x").await);
        assert!(start.elapsed() >= Duration::from_secs(30));
        resumer.await.unwrap();
    }
}
