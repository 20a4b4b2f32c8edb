//! Level and session configuration.
//!
//! - `LevelConfig`: Board dimensions and display name
//! - `LevelCatalog`: The validated list of levels offered to the player
//! - `SessionConfig`: Timing and hint settings shared by every session
//!
//! Levels are data, not code: hosts may load their own list (e.g. from JSON)
//! and `LevelCatalog::new` rejects any board that cannot be dealt.

use serde::{Deserialize, Serialize};

use super::card::ALPHABET_SIZE;
use super::error::{Error, InvalidBoardError, Result};

/// A selectable board size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Human-readable name, shown in the level list and the win message.
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

impl LevelConfig {
    /// Create a level. Not validated; see [`LevelConfig::validate`].
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
        }
    }

    /// Total number of cards on the board.
    ///
    /// Saturates for dimensions that overflow; such a level never validates.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Number of pairs on the board.
    #[must_use]
    pub fn pairs(&self) -> usize {
        self.total_cards() / 2
    }

    /// Board index of a grid position, if it lies on the board.
    #[must_use]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            row.checked_mul(self.cols)?.checked_add(col)
        } else {
            None
        }
    }

    /// Grid position of a board index.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        if index < self.total_cards() {
            Some((index / self.cols, index % self.cols))
        } else {
            None
        }
    }

    /// Check that this board can be dealt as a paired deck.
    pub fn validate(&self) -> std::result::Result<(), InvalidBoardError> {
        validate_board(self.rows, self.cols)
    }
}

/// Check that a `rows` x `cols` board can be dealt as a paired deck.
pub fn validate_board(rows: usize, cols: usize) -> std::result::Result<(), InvalidBoardError> {
    if rows == 0 || cols == 0 {
        return Err(InvalidBoardError::Empty { rows, cols });
    }
    let total = rows
        .checked_mul(cols)
        .ok_or(InvalidBoardError::Oversized { rows, cols })?;
    if total % 2 != 0 {
        return Err(InvalidBoardError::OddCellCount { rows, cols });
    }
    if total / 2 > ALPHABET_SIZE {
        return Err(InvalidBoardError::alphabet_exhausted(total / 2));
    }
    Ok(())
}

/// The levels offered on the level-selection screen.
///
/// Every level in a catalog is known to be valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// Build a catalog, rejecting the first invalid level.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self> {
        for level in &levels {
            level.validate().map_err(|source| Error::InvalidLevel {
                level: level.name.clone(),
                source,
            })?;
        }
        Ok(Self { levels })
    }

    /// The three stock levels: 4x4, 4x6 and 6x6.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            levels: vec![
                LevelConfig::new("Level 1 (4x4)", 4, 4),
                LevelConfig::new("Level 2 (4x6)", 4, 6),
                LevelConfig::new("Level 3 (6x6)", 6, 6),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelConfig> {
        self.levels.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for LevelCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let levels = Vec::<LevelConfig>::deserialize(deserializer)?;
        Self::new(levels).map_err(serde::de::Error::custom)
    }
}

/// Timing and hint settings for a session.
///
/// All durations are milliseconds on the session's logical clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between the second flip and its resolution.
    pub match_delay_ms: u64,

    /// How long a hint keeps the board revealed.
    pub hint_duration_ms: u64,

    /// Period of the timer display tick.
    pub tick_interval_ms: u64,

    /// Hints available at the start of a session.
    pub initial_hints: u32,

    /// Delay between a win and the return to level selection.
    pub win_return_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            match_delay_ms: 1000,
            hint_duration_ms: 2000,
            tick_interval_ms: 1000,
            initial_hints: 2,
            win_return_delay_ms: 500,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_match_delay(mut self, ms: u64) -> Self {
        self.match_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn with_hint_duration(mut self, ms: u64) -> Self {
        self.hint_duration_ms = ms;
        self
    }

    /// Set the tick period. Zero disables the periodic tick.
    #[must_use]
    pub fn with_tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn with_initial_hints(mut self, hints: u32) -> Self {
        self.initial_hints = hints;
        self
    }

    #[must_use]
    pub fn with_win_return_delay(mut self, ms: u64) -> Self {
        self.win_return_delay_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_geometry() {
        let level = LevelConfig::new("Level 2 (4x6)", 4, 6);
        assert_eq!(level.total_cards(), 24);
        assert_eq!(level.pairs(), 12);
        assert_eq!(level.index_of(0, 0), Some(0));
        assert_eq!(level.index_of(1, 2), Some(8));
        assert_eq!(level.index_of(3, 5), Some(23));
        assert_eq!(level.index_of(4, 0), None);
        assert_eq!(level.index_of(0, 6), None);
        assert_eq!(level.position_of(8), Some((1, 2)));
        assert_eq!(level.position_of(24), None);
    }

    #[test]
    fn test_validate_board() {
        assert!(validate_board(4, 4).is_ok());
        assert!(validate_board(2, 26).is_ok());
        assert_eq!(
            validate_board(3, 3),
            Err(InvalidBoardError::OddCellCount { rows: 3, cols: 3 })
        );
        assert_eq!(
            validate_board(6, 9),
            Err(InvalidBoardError::AlphabetExhausted { pairs: 27, max: 26 })
        );
        assert_eq!(validate_board(0, 4), Err(InvalidBoardError::Empty { rows: 0, cols: 4 }));
    }

    #[test]
    fn test_validate_board_overflow() {
        assert_eq!(
            validate_board(usize::MAX, 2),
            Err(InvalidBoardError::Oversized { rows: usize::MAX, cols: 2 })
        );
        // Wraps to zero cells without the guard
        let half = 1usize << (usize::BITS - 1);
        assert_eq!(
            validate_board(half, 2),
            Err(InvalidBoardError::Oversized { rows: half, cols: 2 })
        );

        let level = LevelConfig::new("huge", usize::MAX, 2);
        assert_eq!(level.total_cards(), usize::MAX);
        assert!(level.validate().is_err());
        assert_eq!(level.index_of(usize::MAX - 1, 1), None);
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = LevelCatalog::standard();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().all(|l| l.validate().is_ok()));
        assert_eq!(catalog.get(2).map(|l| l.total_cards()), Some(36));
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn test_catalog_rejects_invalid_level() {
        let err = LevelCatalog::new(vec![
            LevelConfig::new("ok", 2, 2),
            LevelConfig::new("odd", 3, 5),
        ])
        .unwrap_err();

        match err {
            Error::InvalidLevel { level, source } => {
                assert_eq!(level, "odd");
                assert_eq!(source, InvalidBoardError::OddCellCount { rows: 3, cols: 5 });
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new()
            .with_match_delay(10)
            .with_hint_duration(20)
            .with_tick_interval(0)
            .with_initial_hints(5)
            .with_win_return_delay(0);

        assert_eq!(config.match_delay_ms, 10);
        assert_eq!(config.hint_duration_ms, 20);
        assert_eq!(config.tick_interval_ms, 0);
        assert_eq!(config.initial_hints, 5);
        assert_eq!(config.win_return_delay_ms, 0);
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.match_delay_ms, 1000);
        assert_eq!(config.hint_duration_ms, 2000);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.initial_hints, 2);
    }

    #[test]
    fn test_session_config_partial_json() {
        let config: SessionConfig = serde_json::from_str(r#"{"initial_hints": 4}"#).unwrap();
        assert_eq!(config.initial_hints, 4);
        assert_eq!(config.match_delay_ms, 1000);
    }

    #[test]
    fn test_catalog_json_is_validated() {
        let ok: LevelCatalog =
            serde_json::from_str(r#"[{"name": "Tiny", "rows": 2, "cols": 2}]"#).unwrap();
        assert_eq!(ok.len(), 1);

        let bad = serde_json::from_str::<LevelCatalog>(r#"[{"name": "Huge", "rows": 8, "cols": 8}]"#);
        assert!(bad.is_err());

        let json = format!(r#"[{{"name": "Overflow", "rows": {}, "cols": 4}}]"#, usize::MAX / 2);
        assert!(serde_json::from_str::<LevelCatalog>(&json).is_err());

        let json = serde_json::to_string(&LevelCatalog::standard()).unwrap();
        let back: LevelCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LevelCatalog::standard());
    }
}
