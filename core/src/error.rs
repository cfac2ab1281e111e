use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Board must have at least one mine")]
    NoMines,
    #[error("Too many mines, at least one cell must be safe")]
    TooManyMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Mine layout does not match the requested configuration")]
    LayoutMismatch,
    #[error("Board shape does not fit the coordinate range")]
    InvalidBoardShape,
    #[error("Saved game state is inconsistent")]
    InconsistentState,
}

pub type Result<T> = core::result::Result<T, GameError>;
