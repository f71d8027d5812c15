use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell is already occupied")]
    CellOccupied,
    #[error("Column is full")]
    ColumnFull,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("An animation or opponent turn is still running")]
    Busy,
    #[error("Action is not allowed in the current phase")]
    WrongPhase,
    #[error("Already guessed")]
    AlreadyGuessed,
    #[error("Guesses must be a single letter")]
    NotALetter,
    #[error("Ship cannot be placed there")]
    InvalidPlacement,
    #[error("Category has already been scored")]
    CategoryFilled,
    #[error("No rolls left this round")]
    NoRollsLeft,
    #[error("Dice have not been rolled yet")]
    NotRolled,
    #[error("No hints left")]
    NoHintsLeft,
    #[error("{0} is not a digit from 0 to 9")]
    InvalidDigit(u8),
    #[error("Original puzzle cells cannot be changed")]
    OriginalCell,
    #[error("No cell selected")]
    NoSelection,
    #[error("Input is empty")]
    EmptyInput,
    #[error("Not every blank is filled in")]
    Incomplete,
    #[error("Invalid dice formula: {0}")]
    InvalidFormula(String),
    #[error("Selection is not a straight line of cells")]
    InvalidSelection,
    #[error("Unknown player")]
    UnknownPlayer,
    #[error("No room for another player")]
    TooManyPlayers,
    #[error("Nothing to undo")]
    NothingToUndo,
}

pub type Result<T> = core::result::Result<T, GameError>;
