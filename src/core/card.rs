//! Cards, symbols and how a card should look.

use serde::{Deserialize, Serialize};

/// Number of distinct symbols available (`A`..=`Z`).
pub const ALPHABET_SIZE: usize = 26;

/// The hidden face of a card.
///
/// Symbols are opaque to the rules: only equality matters. They display as
/// the letters `A`..=`Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(u8);

impl Symbol {
    /// Symbol number `index` of the alphabet, if it exists.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < ALPHABET_SIZE {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Symbol for an uppercase ASCII letter.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Some(Self(c as u8 - b'A'))
        } else {
            None
        }
    }

    /// Position in the alphabet.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        (b'A' + self.0) as char
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A card on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub symbol: Symbol,
    /// Position on the board, `row * cols + col`.
    pub board_index: usize,
    /// Set once the pair is found. Never cleared.
    pub matched: bool,
}

impl Card {
    #[must_use]
    pub const fn new(symbol: Symbol, board_index: usize) -> Self {
        Self {
            symbol,
            board_index,
            matched: false,
        }
    }
}

/// How the renderer should draw a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardVisual {
    /// Hidden, symbol not shown.
    FaceDown,
    /// Flipped by the player and awaiting resolution.
    FaceUp,
    /// Part of a found pair.
    Matched,
    /// Temporarily revealed by a hint.
    Hinted,
}

impl CardVisual {
    /// Does this visual show the symbol?
    #[must_use]
    pub const fn shows_symbol(self) -> bool {
        !matches!(self, CardVisual::FaceDown)
    }
}

/// Map a card's state to its visual.
///
/// Matched wins over everything, then an open flip, then a running hint.
#[must_use]
pub const fn card_visual(card: &Card, open: bool, hint_active: bool) -> CardVisual {
    if card.matched {
        CardVisual::Matched
    } else if open {
        CardVisual::FaceUp
    } else if hint_active {
        CardVisual::Hinted
    } else {
        CardVisual::FaceDown
    }
}
