// FILE: crates/slideshow/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid speed table: {0}")]
    InvalidSpeedTable(String),

    #[error("Speed {0}ms is not in the speed table")]
    SpeedNotInTable(u64),

    #[error("Invalid speed: {0}ms")]
    InvalidSpeed(u64),
}

pub type EngineResult<T> = Result<T, EngineError>;
