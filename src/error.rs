use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside the board")]
    InvalidCoords,
    #[error("Board dimensions must be positive")]
    InvalidDimensions,
    #[error("Mine percentage must lie in [0, 1]")]
    InvalidMinePercentage,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
