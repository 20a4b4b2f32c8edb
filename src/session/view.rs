//! The renderer contract: view events, the sink they go to, and board snapshots.
//!
//! The engine never touches presentation objects. Every state change is
//! reported synchronously as a [`ViewEvent`] to a [`ViewSink`] the caller
//! injects into each operation. A renderer that prefers full redraws can
//! instead read a [`BoardView`] via `GameSession::snapshot`.

use serde::{Deserialize, Serialize};

use crate::core::{CardVisual, Symbol};

/// Outcome of comparing two open cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Success,
    Fail,
}

/// Which screen the controller is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    MainMenu,
    LevelSelect,
    Game,
}

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Dealt but not started.
    Idle,
    Playing,
    Paused,
    /// All pairs found. Terminal.
    Won,
}

/// A state change the renderer should reflect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewEvent {
    /// A card was flipped face up by the player.
    CardRevealed { index: usize, symbol: Symbol },
    /// A card went back face down.
    CardHidden { index: usize },
    /// A card was temporarily revealed by a hint.
    CardHinted { index: usize, symbol: Symbol },
    /// A card became part of a found pair.
    CardMatched { index: usize },
    /// Two open cards were compared.
    MatchResolved { result: MatchResult, first: usize, second: usize },
    MoveCountChanged { moves: u32 },
    TimerTick { seconds: u64 },
    HintCountChanged { remaining: u32 },
    /// Whether the hint control should accept presses.
    HintAvailabilityChanged { enabled: bool },
    /// Whether unmatched cards accept clicks.
    InputLockChanged { locked: bool },
    PauseChanged { paused: bool },
    GameWon { moves: u32, seconds: u64, level_name: String },
    /// The session was torn down before completion.
    SessionReset,
    ScreenChanged { screen: Screen },
}

/// Receives view events.
///
/// Implemented for `Vec<ViewEvent>` (collect everything), [`EventLog`] and
/// any `FnMut(ViewEvent)` closure.
pub trait ViewSink {
    fn emit(&mut self, event: ViewEvent);
}

impl ViewSink for Vec<ViewEvent> {
    fn emit(&mut self, event: ViewEvent) {
        self.push(event);
    }
}

impl<F> ViewSink for F
where
    F: FnMut(ViewEvent),
{
    fn emit(&mut self, event: ViewEvent) {
        self(event)
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ViewSink for NullSink {
    fn emit(&mut self, _event: ViewEvent) {}
}

/// Buffered sink for renderers that poll.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<ViewEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events, oldest first.
    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl ViewSink for EventLog {
    fn emit(&mut self, event: ViewEvent) {
        log::trace!("view event {:?}", event);
        self.events.push(event);
    }
}

/// How one card should be drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub index: usize,
    pub visual: CardVisual,
    /// Present only when the visual shows the face.
    pub symbol: Option<Symbol>,
    /// Whether a click on this card would be accepted right now.
    pub selectable: bool,
}

/// Everything a renderer needs for a full redraw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub level_name: String,
    pub rows: usize,
    pub cols: usize,
    pub cards: Vec<CardView>,
    pub phase: SessionPhase,
    pub moves: u32,
    pub hints_remaining: u32,
    pub hint_enabled: bool,
    pub input_locked: bool,
    pub seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<ViewEvent> = Vec::new();
        sink.emit(ViewEvent::MoveCountChanged { moves: 1 });
        assert_eq!(sink, vec![ViewEvent::MoveCountChanged { moves: 1 }]);
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut sink = |_event: ViewEvent| count += 1;
            sink.emit(ViewEvent::SessionReset);
            sink.emit(ViewEvent::PauseChanged { paused: true });
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_event_log_drain() {
        let mut log = EventLog::new();
        log.emit(ViewEvent::TimerTick { seconds: 3 });
        assert_eq!(log.events().len(), 1);

        let drained = log.drain();
        assert_eq!(drained, vec![ViewEvent::TimerTick { seconds: 3 }]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_serde() {
        let event = ViewEvent::GameWon {
            moves: 12,
            seconds: 40,
            level_name: "Level 1 (4x4)".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ViewEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
