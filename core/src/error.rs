use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board side length must be at least one cell")]
    InvalidSideLength,
    #[error(
        "number of black holes [{requested}] is bigger than max amount of board cells [{capacity}]"
    )]
    TooManyHazards {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Black hole coordinate [{x} {y}] is outside of the board")]
    InvalidCoords { x: Coord, y: Coord },
    #[error("Black hole coordinate [{x} {y}] is listed more than once")]
    DuplicateHazard { x: Coord, y: Coord },
    #[error("click coordinate [{x} {y}] is out of board bounds {side} x {side}")]
    OutOfBounds { x: i32, y: i32, side: Coord },
    #[error("cell already opened")]
    AlreadyOpened,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
