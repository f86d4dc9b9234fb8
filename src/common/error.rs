use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Invalid arena: {reason}")]
    InvalidArena { reason: String },

    #[error("Path discontinuity at leg {leg}: expected {expected}, got {actual}")]
    PathDiscontinuity {
        leg: usize,
        expected: String,
        actual: String,
    },

    #[error("Invalid transition at step {step}: {reason}")]
    InvalidTransition { step: usize, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Planning task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
