use serde::{Deserialize, Serialize};

use crate::core::{Board, BoardDimensionError, MAX_SHAPE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid board dimensions")]
    Board(BoardDimensionError),
    #[display("board width {width} is narrower than the widest shape ({})", MAX_SHAPE_SIZE)]
    BoardNarrowerThanShape { width: usize },
    #[display("{name} must be positive")]
    NotPositive { name: &'static str },
    #[display("min_interval ({min_interval}) exceeds base_interval ({base_interval})")]
    MinIntervalAboveBase {
        min_interval: u64,
        base_interval: u64,
    },
    #[display("board is {width}x{height}, configured for {expected_width}x{expected_height}")]
    BoardSizeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
}

impl From<BoardDimensionError> for ConfigError {
    fn from(err: BoardDimensionError) -> Self {
        ConfigError::Board(err)
    }
}

/// Constants a host chooses when constructing an [`Engine`](crate::Engine).
///
/// Intervals are opaque "host time units": the engine only compares and
/// reports them, and the host decides what one unit means when it schedules
/// the next tick.
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"board_width": 12}"#).unwrap();
/// assert_eq!(config.board_width, 12);
/// assert_eq!(config.board_height, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of columns.
    pub board_width: usize,
    /// Number of rows.
    pub board_height: usize,
    /// Drop interval at level 1.
    pub base_interval: u64,
    /// Drop interval while soft drop is held.
    pub soft_drop_interval: u64,
    /// Points per cleared row.
    pub score_per_line: u64,
    /// Score needed to advance one level.
    pub level_up_score: u64,
    /// Amount the drop interval shrinks per level.
    pub interval_step: u64,
    /// Lower bound of the drop interval.
    pub min_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            base_interval: 500,
            soft_drop_interval: 50,
            score_per_line: 100,
            level_up_score: 500,
            interval_step: 50,
            min_interval: 100,
        }
    }
}

impl EngineConfig {
    /// The 12-column variant of the board.
    #[must_use]
    pub fn wide() -> Self {
        Self {
            board_width: 12,
            ..Self::default()
        }
    }

    /// Checks the constants for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Board::new(self.board_width, self.board_height)?;
        if self.board_width < MAX_SHAPE_SIZE {
            return Err(ConfigError::BoardNarrowerThanShape {
                width: self.board_width,
            });
        }

        let positive = [
            ("base_interval", self.base_interval),
            ("soft_drop_interval", self.soft_drop_interval),
            ("score_per_line", self.score_per_line),
            ("level_up_score", self.level_up_score),
            ("min_interval", self.min_interval),
        ];
        if let Some((name, _)) = positive.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { name });
        }

        if self.min_interval > self.base_interval {
            return Err(ConfigError::MinIntervalAboveBase {
                min_interval: self.min_interval,
                base_interval: self.base_interval,
            });
        }
        Ok(())
    }

    /// Drop interval at `level`.
    ///
    /// Shrinks by `interval_step` per level above 1 and never goes below
    /// `min_interval`.
    ///
    /// ```
    /// use blockfall_engine::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.drop_interval(1), 500);
    /// assert_eq!(config.drop_interval(2), 450);
    /// assert_eq!(config.drop_interval(100), 100);
    /// ```
    #[must_use]
    pub fn drop_interval(&self, level: u64) -> u64 {
        let reduction = level.saturating_sub(1).saturating_mul(self.interval_step);
        self.base_interval
            .saturating_sub(reduction)
            .max(self.min_interval)
    }
}
