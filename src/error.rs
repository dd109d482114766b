use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnimationError {
    #[error("invalid argument: {name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("invalid argument: {name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },

    #[error("invalid argument: tick must be a finite, non-negative time, got {0}")]
    InvalidTick(f64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
