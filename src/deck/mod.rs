//! Deck generation.
//!
//! A deck is the shuffled sequence of symbols dealt onto the board, one per
//! cell in row-major order. Generation is pure: all randomness comes from
//! the `GameRng` passed in, so a seed fully determines the deal.

mod generator;

pub use generator::{generate, validate_deck};
