//! Step-by-step N-Queens solving with pausable, cancellable backtracking.
//!
//! The [`controller::RunController`] drives one search at a time on a tokio
//! runtime. Every placement and removal made by the search goes through a
//! [`emitter::StepEmitter`], which publishes a board snapshot to a
//! [`emitter::StepSink`] and then waits out the configured delay.

pub mod board;
pub mod config;
pub mod controller;
pub mod emitter;
pub mod error;
pub mod run;
pub mod solver;

pub use board::Board;
pub use config::{Algorithm, BoardSize, Config, Speed};
pub use controller::RunController;
pub use emitter::{Step, StepSink};
pub use error::{ConfigError, ControlError};
pub use run::{Outcome, Phase, RunStatus};
