use thiserror::Error;

/// Error type for invalid model operations.
#[derive(Error, Debug)]
pub enum DiceError {
    #[error("Control vector has the wrong length. Expected {expected}, got {actual}")]
    ControlLength { expected: usize, actual: usize },
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Could not read configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, DiceError>`.
pub type DiceResult<T> = Result<T, DiceError>;
