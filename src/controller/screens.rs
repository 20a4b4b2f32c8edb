//! Screen navigation and session ownership.

use std::time::Duration;

use crate::core::{Error, GameRng, LevelCatalog, LevelConfig, Result, SessionConfig};
use crate::session::{GameSession, Screen, ViewEvent, ViewSink};

/// Drives the screens around a game and owns the current session.
///
/// The controller holds the renderer's [`ViewSink`] and passes it to every
/// session operation, so the session itself never references presentation
/// code. Each new session deals from a fork of the controller's RNG: one
/// master seed reproduces every board of a play-through.
pub struct SessionController<S: ViewSink> {
    catalog: LevelCatalog,
    config: SessionConfig,
    rng: GameRng,
    sink: S,
    screen: Screen,
    session: Option<GameSession>,
}

impl<S: ViewSink> SessionController<S> {
    /// Create a controller showing the main menu.
    pub fn new(catalog: LevelCatalog, config: SessionConfig, rng: GameRng, sink: S) -> Self {
        Self {
            catalog,
            config,
            rng,
            sink,
            screen: Screen::MainMenu,
            session: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// The session being played, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Main menu -> level selection.
    pub fn play(&mut self) -> bool {
        if self.screen != Screen::MainMenu {
            return false;
        }
        self.show(Screen::LevelSelect);
        true
    }

    /// Level selection -> main menu.
    pub fn back(&mut self) -> bool {
        if self.screen != Screen::LevelSelect {
            return false;
        }
        self.show(Screen::MainMenu);
        true
    }

    /// Start the catalog level at `index`.
    pub fn select_level(&mut self, index: usize) -> Result<()> {
        let level = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(Error::UnknownLevel {
                index,
                len: self.catalog.len(),
            })?;
        self.select_level_config(level)
    }

    /// Start a session for an arbitrary level.
    ///
    /// Only valid from the level-selection screen. An invalid board is
    /// reported and leaves the controller where it was.
    pub fn select_level_config(&mut self, level: LevelConfig) -> Result<()> {
        if self.screen != Screen::LevelSelect {
            return Err(Error::NotAtLevelSelect);
        }

        let mut deal = self.rng.fork();
        let mut session = GameSession::new(level, self.config.clone(), &mut deal)?;
        log::info!("dealing '{}' with seed {}", session.level().name, deal.seed());

        self.show(Screen::Game);
        session.start(&mut self.sink);
        self.session = Some(session);
        Ok(())
    }

    /// Flip the card at a grid position.
    pub fn flip(&mut self, row: usize, col: usize) -> bool {
        match self.session.as_mut() {
            Some(session) => session.flip_at(row, col, &mut self.sink),
            None => false,
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.toggle_pause(&mut self.sink),
            None => false,
        }
    }

    pub fn use_hint(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.use_hint(&mut self.sink),
            None => false,
        }
    }

    /// Abandon the current session and return to level selection.
    pub fn reset(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        session.reset(&mut self.sink);
        self.show(Screen::LevelSelect);
        true
    }

    /// Advance the current session's clock.
    ///
    /// Once the win-return delay has passed after a win, the finished
    /// session is dropped and level selection is shown.
    pub fn advance(&mut self, elapsed: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.advance(elapsed, &mut self.sink);

        let finished = session
            .won_at_ms()
            .is_some_and(|won_at| session.now_ms() >= won_at.saturating_add(self.config.win_return_delay_ms));
        if finished {
            self.session = None;
            self.show(Screen::LevelSelect);
        }
    }

    fn show(&mut self, screen: Screen) {
        log::debug!("screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.sink.emit(ViewEvent::ScreenChanged { screen });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SessionController<Vec<ViewEvent>> {
        SessionController::new(
            LevelCatalog::standard(),
            SessionConfig::default(),
            GameRng::new(42),
            Vec::new(),
        )
    }

    #[test]
    fn test_menu_navigation() {
        let mut c = controller();
        assert_eq!(c.screen(), Screen::MainMenu);
        assert!(!c.back());

        assert!(c.play());
        assert_eq!(c.screen(), Screen::LevelSelect);
        assert!(!c.play());

        assert!(c.back());
        assert_eq!(c.screen(), Screen::MainMenu);
    }

    #[test]
    fn test_select_requires_level_screen() {
        let mut c = controller();
        assert_eq!(c.select_level(0), Err(Error::NotAtLevelSelect));
    }

    #[test]
    fn test_unknown_level() {
        let mut c = controller();
        c.play();
        assert_eq!(c.select_level(7), Err(Error::UnknownLevel { index: 7, len: 3 }));
        assert_eq!(c.screen(), Screen::LevelSelect);
    }

    #[test]
    fn test_invalid_custom_level_stays_on_select() {
        let mut c = controller();
        c.play();
        let err = c.select_level_config(LevelConfig::new("Odd", 3, 3)).unwrap_err();
        assert!(matches!(err, Error::InvalidBoard(_)));
        assert_eq!(c.screen(), Screen::LevelSelect);
        assert!(c.session().is_none());
    }

    #[test]
    fn test_intents_without_session_are_ignored() {
        let mut c = controller();
        assert!(!c.flip(0, 0));
        assert!(!c.toggle_pause());
        assert!(!c.use_hint());
        assert!(!c.reset());
    }
}
