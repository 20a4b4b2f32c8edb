//! The game session: board state and every rule of play.

use std::time::Duration;

use im::Vector;
use smallvec::SmallVec;

use crate::core::{card_visual, Card, CardVisual, GameRng, InvalidBoardError, LevelConfig, SessionConfig, Symbol};
use crate::deck;

use super::scheduler::{DueTask, Scheduler, TaskId, TaskKind};
use super::view::{BoardView, CardView, MatchResult, SessionPhase, ViewEvent, ViewSink};

/// Timers that freeze while the session is paused.
const PAUSABLE: [TaskKind; 2] = [TaskKind::ResolveMatch, TaskKind::EndHint];

/// Input gates as the renderer sees them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Gates {
    locked: bool,
    hint_enabled: bool,
}

/// One play-through of a level.
///
/// ## Lifecycle
///
/// `Idle -> Playing -> {Paused <-> Playing} -> Won`. A session is created
/// `Idle` and begins with [`GameSession::start`]; [`GameSession::new_session`]
/// does both. `Won` is terminal; [`GameSession::reset`] consumes the session
/// and cancels all of its timers.
///
/// ## Time
///
/// The session keeps a logical millisecond clock that only moves through
/// [`GameSession::advance`]. The two delayed steps (match resolution and the
/// end of a hint) and the periodic timer tick are tasks on that clock.
///
/// ## Events
///
/// Every operation takes the [`ViewSink`] to report changes to. Rejected
/// intents emit nothing.
#[derive(Clone, Debug)]
pub struct GameSession {
    level: LevelConfig,
    config: SessionConfig,
    cards: Vector<Card>,
    open: SmallVec<[usize; 2]>,
    matched_count: usize,
    move_count: u32,
    hints_remaining: u32,
    hint_active: bool,
    phase: SessionPhase,

    scheduler: Scheduler,
    pending_resolution: Option<TaskId>,
    pending_hint: Option<TaskId>,
    tick_task: Option<TaskId>,

    now: u64,
    started_at: Option<u64>,
    paused_at: Option<u64>,
    paused_total: u64,
    finished_at: Option<u64>,
}

impl GameSession {
    /// Deal a new idle session for `level`.
    pub fn new(level: LevelConfig, config: SessionConfig, rng: &mut GameRng) -> Result<Self, InvalidBoardError> {
        let symbols = deck::generate(level.rows, level.cols, rng)?;
        Ok(Self::with_deck(level, config, symbols))
    }

    /// Build an idle session from an explicit deck, in row-major order.
    pub fn from_symbols(
        level: LevelConfig,
        config: SessionConfig,
        symbols: Vec<Symbol>,
    ) -> Result<Self, InvalidBoardError> {
        deck::validate_deck(level.rows, level.cols, &symbols)?;
        Ok(Self::with_deck(level, config, symbols))
    }

    /// Deal and start a session in one step.
    pub fn new_session(
        level: LevelConfig,
        config: SessionConfig,
        rng: &mut GameRng,
        sink: &mut impl ViewSink,
    ) -> Result<Self, InvalidBoardError> {
        let mut session = Self::new(level, config, rng)?;
        session.start(sink);
        Ok(session)
    }

    fn with_deck(level: LevelConfig, config: SessionConfig, symbols: Vec<Symbol>) -> Self {
        let cards = symbols
            .into_iter()
            .enumerate()
            .map(|(index, symbol)| Card::new(symbol, index))
            .collect();

        Self {
            hints_remaining: config.initial_hints,
            level,
            config,
            cards,
            open: SmallVec::new(),
            matched_count: 0,
            move_count: 0,
            hint_active: false,
            phase: SessionPhase::Idle,
            scheduler: Scheduler::new(),
            pending_resolution: None,
            pending_hint: None,
            tick_task: None,
            now: 0,
            started_at: None,
            paused_at: None,
            paused_total: 0,
            finished_at: None,
        }
    }

    // === Operations ===

    /// Start play: record the start time and begin ticking.
    ///
    /// Returns false if the session was already started.
    pub fn start(&mut self, sink: &mut impl ViewSink) -> bool {
        if self.phase != SessionPhase::Idle {
            log::debug!("ignoring start: session is {:?}", self.phase);
            return false;
        }
        let before = self.gates();

        self.phase = SessionPhase::Playing;
        self.started_at = Some(self.now);
        if self.config.tick_interval_ms > 0 {
            self.tick_task = Some(
                self.scheduler
                    .schedule(TaskKind::Tick, self.now, self.config.tick_interval_ms),
            );
        }

        log::info!(
            "started '{}' ({} cards, {} hints)",
            self.level.name,
            self.cards.len(),
            self.hints_remaining
        );
        sink.emit(ViewEvent::MoveCountChanged { moves: self.move_count });
        sink.emit(ViewEvent::HintCountChanged { remaining: self.hints_remaining });
        sink.emit(ViewEvent::TimerTick { seconds: 0 });
        self.notify_gates(before, sink);
        true
    }

    /// Flip the card at `index`.
    ///
    /// Returns whether the flip was accepted. Completing a pair counts a move
    /// and schedules exactly one resolution after the match delay.
    pub fn flip(&mut self, index: usize, sink: &mut impl ViewSink) -> bool {
        if let Some(reason) = self.flip_rejection(index) {
            log::debug!("ignoring flip of card {}: {}", index, reason);
            return false;
        }
        let before = self.gates();

        self.open.push(index);
        sink.emit(ViewEvent::CardRevealed {
            index,
            symbol: self.cards[index].symbol,
        });

        if self.open.len() == 2 {
            self.move_count += 1;
            sink.emit(ViewEvent::MoveCountChanged { moves: self.move_count });
            self.pending_resolution = Some(self.scheduler.schedule(
                TaskKind::ResolveMatch,
                self.now,
                self.config.match_delay_ms,
            ));
        }

        self.notify_gates(before, sink);
        true
    }

    /// Flip the card at a grid position.
    pub fn flip_at(&mut self, row: usize, col: usize, sink: &mut impl ViewSink) -> bool {
        match self.level.index_of(row, col) {
            Some(index) => self.flip(index, sink),
            None => {
                log::debug!("ignoring flip at ({}, {}): off the board", row, col);
                false
            }
        }
    }

    /// Compare the two open cards now.
    ///
    /// Normally run by the scheduled resolution; calling it directly cancels
    /// that task. With fewer than two cards open it only clears the pending
    /// resolution and returns `None`.
    pub fn resolve_match(&mut self, sink: &mut impl ViewSink) -> Option<MatchResult> {
        if matches!(self.phase, SessionPhase::Idle | SessionPhase::Won) {
            return None;
        }
        let before = self.gates();
        if let Some(id) = self.pending_resolution.take() {
            self.scheduler.cancel(id);
        }

        if self.open.len() < 2 {
            self.notify_gates(before, sink);
            return None;
        }

        let (first, second) = (self.open[0], self.open[1]);
        let result = if self.cards[first].symbol == self.cards[second].symbol {
            for index in [first, second] {
                if let Some(card) = self.cards.get_mut(index) {
                    card.matched = true;
                }
                sink.emit(ViewEvent::CardMatched { index });
            }
            self.matched_count += 2;
            MatchResult::Success
        } else {
            for index in [first, second] {
                if self.hint_active {
                    sink.emit(ViewEvent::CardHinted {
                        index,
                        symbol: self.cards[index].symbol,
                    });
                } else {
                    sink.emit(ViewEvent::CardHidden { index });
                }
            }
            MatchResult::Fail
        };
        self.open.clear();

        log::debug!("cards {} and {}: {:?}", first, second, result);
        sink.emit(ViewEvent::MatchResolved { result, first, second });

        if self.matched_count == self.cards.len() {
            self.win(sink);
        }
        self.notify_gates(before, sink);
        Some(result)
    }

    /// Pause or resume play.
    ///
    /// Pausing freezes the elapsed time and any pending resolution or hint
    /// timer; resuming re-arms them with the time they had left. Returns
    /// false outside of play.
    pub fn toggle_pause(&mut self, sink: &mut impl ViewSink) -> bool {
        let before = self.gates();

        match self.phase {
            SessionPhase::Playing => {
                self.phase = SessionPhase::Paused;
                self.paused_at = Some(self.now);
                self.scheduler.suspend(&PAUSABLE, self.now);
                log::debug!("paused at {}ms", self.now);
                sink.emit(ViewEvent::PauseChanged { paused: true });
            }
            SessionPhase::Paused => {
                self.phase = SessionPhase::Playing;
                if let Some(at) = self.paused_at.take() {
                    self.paused_total += self.now - at;
                }
                self.scheduler.resume(self.now);
                log::debug!("resumed at {}ms", self.now);
                sink.emit(ViewEvent::PauseChanged { paused: false });
                sink.emit(ViewEvent::TimerTick {
                    seconds: self.elapsed_seconds(),
                });
            }
            SessionPhase::Idle | SessionPhase::Won => {
                log::debug!("ignoring pause: session is {:?}", self.phase);
                return false;
            }
        }

        self.notify_gates(before, sink);
        true
    }

    /// Reveal every unmatched card for the hint duration.
    ///
    /// Returns whether a hint was used.
    pub fn use_hint(&mut self, sink: &mut impl ViewSink) -> bool {
        let rejection = match self.phase {
            SessionPhase::Paused => Some("paused"),
            SessionPhase::Idle | SessionPhase::Won => Some("not in play"),
            SessionPhase::Playing if self.hints_remaining == 0 => Some("no hints left"),
            SessionPhase::Playing if self.hint_active => Some("hint already showing"),
            SessionPhase::Playing => None,
        };
        if let Some(reason) = rejection {
            log::debug!("ignoring hint: {}", reason);
            return false;
        }
        let before = self.gates();

        self.hints_remaining -= 1;
        self.hint_active = true;
        sink.emit(ViewEvent::HintCountChanged {
            remaining: self.hints_remaining,
        });

        for card in self.cards.iter().filter(|c| !c.matched) {
            if !self.open.contains(&card.board_index) {
                sink.emit(ViewEvent::CardHinted {
                    index: card.board_index,
                    symbol: card.symbol,
                });
            }
        }

        self.pending_hint = Some(self.scheduler.schedule(
            TaskKind::EndHint,
            self.now,
            self.config.hint_duration_ms,
        ));
        log::debug!("hint used, {} left", self.hints_remaining);

        self.notify_gates(before, sink);
        true
    }

    /// Hide the cards revealed by the running hint.
    ///
    /// Normally run by the scheduled task; calling it directly cancels that
    /// task. Returns false when no hint is showing.
    pub fn end_hint(&mut self, sink: &mut impl ViewSink) -> bool {
        if !self.hint_active {
            return false;
        }
        let before = self.gates();
        if let Some(id) = self.pending_hint.take() {
            self.scheduler.cancel(id);
        }

        self.hint_active = false;
        for card in self.cards.iter().filter(|c| !c.matched) {
            if !self.open.contains(&card.board_index) {
                sink.emit(ViewEvent::CardHidden {
                    index: card.board_index,
                });
            }
        }

        self.notify_gates(before, sink);
        true
    }

    /// Report the elapsed time, unless paused.
    pub fn tick(&mut self, sink: &mut impl ViewSink) {
        if self.phase == SessionPhase::Playing {
            sink.emit(ViewEvent::TimerTick {
                seconds: self.elapsed_seconds(),
            });
        }
    }

    /// Move the logical clock forward, firing every task that comes due.
    ///
    /// Tasks fire in due order with the clock set to their due time.
    pub fn advance(&mut self, elapsed: Duration, sink: &mut impl ViewSink) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let target = self.now.saturating_add(elapsed_ms);

        while let Some(task) = self.scheduler.pop_due(target) {
            self.now = task.due_at;
            self.run_task(task, sink);
        }
        self.now = target;
    }

    /// Tear the session down, cancelling every pending timer.
    ///
    /// Returns the number of timers cancelled.
    pub fn reset(mut self, sink: &mut impl ViewSink) -> usize {
        let cancelled = self.scheduler.cancel_all();
        log::info!(
            "reset '{}' after {} moves, {} pending timers cancelled",
            self.level.name,
            self.move_count,
            cancelled
        );
        sink.emit(ViewEvent::SessionReset);
        cancelled
    }

    fn run_task(&mut self, task: DueTask, sink: &mut impl ViewSink) {
        match task.kind {
            TaskKind::ResolveMatch if self.pending_resolution == Some(task.id) => {
                self.resolve_match(sink);
            }
            TaskKind::EndHint if self.pending_hint == Some(task.id) => {
                self.end_hint(sink);
            }
            TaskKind::Tick if self.tick_task == Some(task.id) => {
                self.tick(sink);
                self.tick_task = if self.phase == SessionPhase::Won {
                    None
                } else {
                    Some(
                        self.scheduler
                            .schedule(TaskKind::Tick, self.now, self.config.tick_interval_ms),
                    )
                };
            }
            _ => log::trace!("dropping stale {:?} ({})", task.kind, task.id),
        }
    }

    fn win(&mut self, sink: &mut impl ViewSink) {
        self.phase = SessionPhase::Won;
        self.finished_at = Some(self.now);
        self.hint_active = false;
        self.pending_hint = None;
        self.pending_resolution = None;
        self.tick_task = None;
        self.scheduler.cancel_all();

        let seconds = self.elapsed_seconds();
        log::info!(
            "won '{}' in {} moves and {}s",
            self.level.name,
            self.move_count,
            seconds
        );
        sink.emit(ViewEvent::GameWon {
            moves: self.move_count,
            seconds,
            level_name: self.level.name.clone(),
        });
    }

    fn flip_rejection(&self, index: usize) -> Option<&'static str> {
        match self.phase {
            SessionPhase::Paused => return Some("paused"),
            SessionPhase::Idle | SessionPhase::Won => return Some("not in play"),
            SessionPhase::Playing => {}
        }
        if self.input_locked() {
            return Some("input locked");
        }
        match self.cards.get(index) {
            None => Some("off the board"),
            Some(card) if card.matched => Some("already matched"),
            Some(_) if self.open.contains(&index) => Some("already open"),
            Some(_) if self.open.len() >= 2 => Some("two cards already open"),
            Some(_) => None,
        }
    }

    fn gates(&self) -> Gates {
        Gates {
            locked: self.input_locked(),
            hint_enabled: self.hint_enabled(),
        }
    }

    fn notify_gates(&self, before: Gates, sink: &mut impl ViewSink) {
        let after = self.gates();
        if after.locked != before.locked {
            sink.emit(ViewEvent::InputLockChanged { locked: after.locked });
        }
        if after.hint_enabled != before.hint_enabled {
            sink.emit(ViewEvent::HintAvailabilityChanged {
                enabled: after.hint_enabled,
            });
        }
    }

    // === Queries ===

    #[must_use]
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Indices of the face-up, unresolved cards, in flip order.
    #[must_use]
    pub fn open_indices(&self) -> &[usize] {
        &self.open
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    #[must_use]
    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    #[must_use]
    pub fn hint_active(&self) -> bool {
        self.hint_active
    }

    #[must_use]
    pub fn resolution_pending(&self) -> bool {
        self.pending_resolution.is_some()
    }

    /// Whether flips are currently refused wholesale.
    ///
    /// True outside of play, while paused, while a hint is showing, and while
    /// a pair waits for resolution.
    #[must_use]
    pub fn input_locked(&self) -> bool {
        self.phase != SessionPhase::Playing || self.hint_active || self.pending_resolution.is_some()
    }

    /// Whether the hint control should accept presses.
    #[must_use]
    pub fn hint_enabled(&self) -> bool {
        self.phase == SessionPhase::Playing && self.hints_remaining > 0 && !self.hint_active
    }

    /// Whether a flip of `index` would be accepted right now.
    #[must_use]
    pub fn is_selectable(&self, index: usize) -> bool {
        self.flip_rejection(index).is_none()
    }

    #[must_use]
    pub fn visual(&self, index: usize) -> Option<CardVisual> {
        self.cards
            .get(index)
            .map(|card| card_visual(card, self.open.contains(&index), self.hint_active))
    }

    /// Timers still pending (resolution, hint, tick).
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Logical time at which the last pair was found.
    #[must_use]
    pub fn won_at_ms(&self) -> Option<u64> {
        self.finished_at
    }

    /// Current logical time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now
    }

    /// Play time in milliseconds, excluding paused time. Frozen once won.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let end = self.finished_at.unwrap_or(self.now);
        let paused = self.paused_total + self.paused_at.map_or(0, |at| end - at);
        end.saturating_sub(started_at).saturating_sub(paused)
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ms() / 1000
    }

    /// Full view of the board for a redraw.
    #[must_use]
    pub fn snapshot(&self) -> BoardView {
        let cards = self
            .cards
            .iter()
            .map(|card| {
                let visual = card_visual(card, self.open.contains(&card.board_index), self.hint_active);
                CardView {
                    index: card.board_index,
                    visual,
                    symbol: visual.shows_symbol().then_some(card.symbol),
                    selectable: self.is_selectable(card.board_index),
                }
            })
            .collect();

        BoardView {
            level_name: self.level.name.clone(),
            rows: self.level.rows,
            cols: self.level.cols,
            cards,
            phase: self.phase,
            moves: self.move_count,
            hints_remaining: self.hints_remaining,
            hint_enabled: self.hint_enabled(),
            input_locked: self.input_locked(),
            seconds: self.elapsed_seconds(),
        }
    }
}
