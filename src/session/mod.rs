//! Game sessions: the rules engine.
//!
//! A [`GameSession`] owns the board, counters, and every pending timer of
//! one play-through. It is single-threaded and cooperative: nothing happens
//! between calls, and delayed steps run when the host advances the
//! session's logical clock.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_match::core::{GameRng, LevelConfig, SessionConfig};
//! use memory_match::session::{GameSession, ViewEvent};
//!
//! let mut rng = GameRng::new(42);
//! let mut events: Vec<ViewEvent> = Vec::new();
//! let mut session = GameSession::new_session(
//!     LevelConfig::new("Level 1 (4x4)", 4, 4),
//!     SessionConfig::default(),
//!     &mut rng,
//!     &mut events,
//! )
//! .unwrap();
//!
//! session.flip(0, &mut events);
//! session.flip(1, &mut events);
//! assert_eq!(session.move_count(), 1);
//! assert!(session.input_locked());
//!
//! // The pair resolves one second later
//! session.advance(Duration::from_secs(1), &mut events);
//! assert!(!session.input_locked());
//! ```

mod scheduler;
mod state;
mod view;

pub use scheduler::{DueTask, Scheduler, TaskId, TaskKind};
pub use state::GameSession;
pub use view::{
    BoardView, CardView, EventLog, MatchResult, NullSink, Screen, SessionPhase, ViewEvent, ViewSink,
};
