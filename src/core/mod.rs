//! Core types: symbols, cards, configuration, errors and RNG.
//!
//! Everything here is plain data. Rules live in `session`.

pub mod card;
pub mod config;
pub mod error;
pub mod rng;

pub use card::{card_visual, Card, CardVisual, Symbol, ALPHABET_SIZE};
pub use config::{validate_board, LevelCatalog, LevelConfig, SessionConfig};
pub use error::{Error, InvalidBoardError, Result};
pub use rng::GameRng;
