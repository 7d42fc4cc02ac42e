use thiserror::Error;

/// Errors raised while setting up or configuring a simulation.
///
/// Running out of free cells during play is not an error: those operations
/// return `None` and the turn goes on.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Grid size must be at least 1, got {0}")]
    InvalidGridSize(usize),

    #[error("A game needs at least one snake")]
    NoSnakes,

    #[error("Cannot place {snakes} snakes on a grid with {cells} cells")]
    TooManySnakes { snakes: usize, cells: usize },

    #[error("Food period must be at least 1")]
    InvalidFoodPeriod,

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
