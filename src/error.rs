use thiserror::Error;

/// Rejected configuration at the presentation boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board size {size} is outside {min}..={max}")]
    BoardSizeOutOfRange { size: usize, min: usize, max: usize },

    #[error("unsupported speed {0} ms")]
    UnsupportedSpeed(u64),

    #[error("unknown algorithm {0:?}, expected \"dfs\" or \"csp\"")]
    UnknownAlgorithm(String),

    #[error("not a number: {0:?}")]
    InvalidNumber(String),
}

/// Intents the run controller refuses in its current state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    #[error("a run is already in progress")]
    AlreadyRunning,

    #[error("no run is in progress")]
    NotRunning,

    #[error("settings cannot change while a run is in progress")]
    Busy,
}
