use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error(
        "Mismatched sample arrays: {positions} positions, {tangents} tangents, {distances} distances"
    )]
    MismatchedLengths {
        positions: usize,
        tangents: usize,
        distances: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;
