use crate::board::Board;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

pub const READY_MESSAGE: &str = "Ready to solve";
pub const STARTING_MESSAGE: &str = "Starting...";
pub const NO_SOLUTION_MESSAGE: &str = "No solution found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Signals {
    paused: bool,
    cancelled: bool,
}

/// Controller-side half of a run: writes the pause and cancel signals.
///
/// Dropping the handle also reads as cancellation on the run side.
#[derive(Debug)]
pub struct RunHandle {
    id: u64,
    signals: watch::Sender<Signals>,
}

/// Engine-side half of a run, threaded through the recursion.
#[derive(Debug)]
pub struct RunContext {
    id: u64,
    signals: watch::Receiver<Signals>,
}

/// Creates a linked handle/context pair for run `id`.
pub fn channel(id: u64) -> (RunHandle, RunContext) {
    let (tx, rx) = watch::channel(Signals::default());
    (RunHandle { id, signals: tx }, RunContext { id, signals: rx })
}

impl RunHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.signals.send_modify(|s| s.cancelled = true);
    }

    pub fn set_paused(&self, paused: bool) {
        self.signals.send_modify(|s| s.paused = paused);
    }

    pub fn is_cancelled(&self) -> bool {
        self.signals.borrow().cancelled
    }
}

impl RunContext {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.signals.has_changed().is_err() || self.signals.borrow().cancelled
    }

    pub fn is_paused(&self) -> bool {
        self.signals.borrow().paused
    }

    /// Resolves on the next signal change. `false` means the handle is gone.
    pub(crate) async fn changed(&mut self) -> bool {
        self.signals.changed().await.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Solved,
    Exhausted,
    Cancelled,
}

/// What the presentation shows: the latest published board plus counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatus {
    pub phase: Phase,
    pub step_count: u64,
    pub message: String,
    pub board: Board,
    /// Set when a run finishes on its own; cleared by start and reset.
    pub outcome: Option<Outcome>,
}

impl RunStatus {
    pub fn ready(n: usize) -> Self {
        Self {
            phase: Phase::Idle,
            step_count: 0,
            message: READY_MESSAGE.to_owned(),
            board: Board::new(n),
            outcome: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }
}

/// Status shared between the controller and the in-flight run. `current`
/// is the id of the run allowed to touch it.
#[derive(Debug)]
pub(crate) struct Shared {
    pub status: RunStatus,
    pub current: u64,
}

pub(crate) type SharedStatus = Arc<Mutex<Shared>>;

pub(crate) fn lock(shared: &SharedStatus) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
