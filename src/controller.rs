use crate::config::{Algorithm, BoardSize, Config, Speed};
use crate::emitter::{StepEmitter, StepSink};
use crate::error::ControlError;
use crate::run::{
    self, Outcome, Phase, RunHandle, RunStatus, Shared, SharedStatus, STARTING_MESSAGE,
};
use crate::solver;
use log::info;
use std::sync::{Arc, Mutex};
use tokio::{runtime::Handle, task::JoinHandle};

struct ActiveRun {
    handle: RunHandle,
    task: Option<JoinHandle<Outcome>>,
}

/// Owns at most one in-flight search and turns user intents into signals
/// the running search observes at its next step.
pub struct RunController {
    config: Config,
    runtime: Handle,
    sink: Arc<dyn StepSink>,
    shared: SharedStatus,
    run: Option<ActiveRun>,
    next_id: u64,
}

impl RunController {
    /// Runs are spawned onto `runtime`; `sink` sees every published step.
    pub fn new(config: Config, runtime: Handle, sink: Arc<dyn StepSink>) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            status: RunStatus::ready(config.size.get()),
            current: 0,
        }));
        Self {
            config,
            runtime,
            sink,
            shared,
            run: None,
            next_id: 1,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn status(&self) -> RunStatus {
        run::lock(&self.shared).status.clone()
    }

    pub fn is_running(&self) -> bool {
        run::lock(&self.shared).status.is_running()
    }

    pub fn start(&mut self) -> Result<u64, ControlError> {
        let mut shared = run::lock(&self.shared);
        if shared.status.is_running() {
            return Err(ControlError::AlreadyRunning);
        }

        let id = self.next_id;
        self.next_id += 1;
        if let Some(old) = self.run.take() {
            old.handle.cancel();
        }
        let (handle, ctx) = run::channel(id);

        let n = self.config.size.get();
        shared.current = id;
        shared.status = RunStatus {
            phase: Phase::Running,
            message: STARTING_MESSAGE.to_owned(),
            ..RunStatus::ready(n)
        };
        drop(shared);

        let algorithm = self.config.algorithm;
        let mut emitter = StepEmitter::new(
            ctx,
            self.config.speed.delay(),
            Arc::clone(&self.shared),
            Arc::clone(&self.sink),
        );
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.sink);
        info!("run {id}: solving n={n} with {algorithm} at {}", self.config.speed);

        let task = self.runtime.spawn(async move {
            let mut outcome = solver::solve(algorithm, n, &mut emitter).await;
            {
                let mut guard = run::lock(&shared);
                if emitter.is_cancelled() || guard.current != id {
                    outcome = Outcome::Cancelled;
                } else {
                    guard.status.phase = Phase::Idle;
                    guard.status.outcome = Some(outcome);
                    sink.finished(outcome);
                }
            }
            info!("run {id}: {outcome:?}");
            outcome
        });

        self.run = Some(ActiveRun {
            handle,
            task: Some(task),
        });
        Ok(id)
    }

    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.set_paused(true)
    }

    pub fn resume(&mut self) -> Result<(), ControlError> {
        self.set_paused(false)
    }

    pub fn toggle_pause(&mut self) -> Result<(), ControlError> {
        let paused = self.status().is_paused();
        self.set_paused(!paused)
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), ControlError> {
        let mut shared = run::lock(&self.shared);
        let run = match &self.run {
            Some(run) if shared.status.is_running() => run,
            _ => return Err(ControlError::NotRunning),
        };
        run.handle.set_paused(paused);
        shared.status.phase = if paused { Phase::Paused } else { Phase::Running };
        info!("run {}: {}", run.handle.id(), if paused { "paused" } else { "resumed" });
        Ok(())
    }

    /// Cancels the active run and returns to idle without waiting for the
    /// search to unwind. The board keeps its last published state.
    pub fn stop(&mut self) {
        let mut shared = run::lock(&self.shared);
        if let Some(run) = &self.run {
            if !run.handle.is_cancelled() {
                info!("run {}: stopping", run.handle.id());
            }
            run.handle.cancel();
        }
        shared.status.phase = Phase::Idle;
    }

    /// Stops any run and clears the board at the configured size.
    pub fn reset(&mut self) {
        self.stop();
        let mut shared = run::lock(&self.shared);
        shared.status = RunStatus::ready(self.config.size.get());
    }

    pub fn reset_to(&mut self, size: BoardSize) {
        self.config.size = size;
        self.reset();
    }

    pub fn set_board_size(&mut self, size: BoardSize) -> Result<(), ControlError> {
        self.ensure_idle()?;
        self.reset_to(size);
        Ok(())
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<(), ControlError> {
        self.ensure_idle()?;
        self.config.algorithm = algorithm;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: Speed) -> Result<(), ControlError> {
        self.ensure_idle()?;
        self.config.speed = speed;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), ControlError> {
        if self.is_running() {
            Err(ControlError::Busy)
        } else {
            Ok(())
        }
    }

    /// Waits for the most recently started run to finish unwinding.
    /// `None` if there is nothing left to wait for.
    pub async fn join(&mut self) -> Option<Outcome> {
        let task = self.run.as_mut()?.task.take()?;
        task.await.ok()
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.stop();
    }
}
