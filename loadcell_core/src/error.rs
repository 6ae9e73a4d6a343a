use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CoreError {
    #[error("bus error: {0}")]
    Bus(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("timeout waiting for ads1230 data-ready")]
    Timeout,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing capacity")]
    MissingCapacity,
    #[error("missing sensitivity")]
    MissingSensitivity,
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("scheduler full: at most {max} load cells can be registered")]
    Full { max: usize },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
