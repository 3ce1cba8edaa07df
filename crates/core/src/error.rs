use thiserror::Error;

use crate::types::Position;

/// Rejected custom starting layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("snake must have at least one segment")]
    EmptySnake,
    #[error("snake of {0} segments does not fit on the board")]
    TooLong(usize),
    #[error("{0:?} is off the board")]
    OutOfBounds(Position),
    #[error("{0:?} appears more than once in the snake")]
    Overlap(Position),
    #[error("food at {0:?} is on the snake")]
    FoodOnSnake(Position),
}
