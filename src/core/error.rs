//! Error types.
//!
//! Only session construction can fail. Gameplay rule violations (clicking a
//! locked card, hinting with none left) are silent no-ops, never errors.

use thiserror::Error;

use super::card::ALPHABET_SIZE;

/// A board that cannot be dealt as a paired deck.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidBoardError {
    /// A dimension is zero.
    #[error("board {rows}x{cols} has no cells")]
    Empty { rows: usize, cols: usize },

    /// Odd cell count: some card would have no partner.
    #[error("board {rows}x{cols} has an odd number of cards")]
    OddCellCount { rows: usize, cols: usize },

    /// The cell count does not fit in `usize`.
    #[error("board {rows}x{cols} is too large")]
    Oversized { rows: usize, cols: usize },

    /// More pairs than distinct symbols.
    #[error("board needs {pairs} pairs but only {max} symbols exist")]
    AlphabetExhausted { pairs: usize, max: usize },

    /// An explicit deck does not fit the board or is not properly paired.
    #[error("deck is not a paired deck for this board: {0}")]
    MalformedDeck(String),
}

impl InvalidBoardError {
    pub(crate) fn alphabet_exhausted(pairs: usize) -> Self {
        Self::AlphabetExhausted { pairs, max: ALPHABET_SIZE }
    }
}

/// Crate-wide error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid level '{level}': {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: InvalidBoardError,
    },

    #[error(transparent)]
    InvalidBoard(#[from] InvalidBoardError),

    /// Level selection index outside the catalog.
    #[error("no level at index {index} (catalog has {len})")]
    UnknownLevel { index: usize, len: usize },

    /// Level selection attempted from a screen that does not offer it.
    #[error("levels can only be selected from the level-selection screen")]
    NotAtLevelSelect,
}

/// Result alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
