//! # memory-match
//!
//! A game-state engine for single-player memory (card-flip) games.
//!
//! ## Design Principles
//!
//! 1. **Renderer-Agnostic**: The engine never holds a presentation object.
//!    Every state change is reported as a `ViewEvent` to a `ViewSink` the
//!    caller injects.
//!
//! 2. **Deterministic**: Decks come from a seeded `GameRng` and time is a
//!    logical clock advanced by the host, so any game can be replayed
//!    exactly.
//!
//! 3. **Owned Timers**: The delayed steps of play (pair resolution, end of
//!    a hint, timer tick) are cancellable tasks owned by the session. When a
//!    session goes away, so does every callback it scheduled.
//!
//! ## Modules
//!
//! - `core`: Symbols, cards, level and session configuration, errors, RNG
//! - `deck`: Paired deck generation
//! - `session`: The rules engine, its scheduler and the view contract
//! - `controller`: Screen flow and level selection

pub mod core;
pub mod deck;
pub mod session;
pub mod controller;

// Re-export commonly used types
pub use crate::core::{
    Card, CardVisual, Symbol,
    Error, InvalidBoardError, Result,
    GameRng,
    LevelCatalog, LevelConfig, SessionConfig,
};

pub use crate::session::{
    GameSession, SessionPhase, MatchResult,
    ViewEvent, ViewSink, EventLog, NullSink,
    BoardView, CardView, Screen,
};

pub use crate::controller::SessionController;
