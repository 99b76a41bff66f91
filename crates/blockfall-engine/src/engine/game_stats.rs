use serde::{Deserialize, Serialize};

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// - **Score**: `score_per_line` points for every cleared row, awarded once per
///   lock for all rows cleared by it
/// - **Level**: derived from score (`score / level_up_score + 1`)
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: how many locks cleared 0, 1, 2, 3 or 4 rows
///
/// There are no combo, back-to-back, or T-spin bonuses; the score only grows
/// in multiples of `score_per_line`.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new(100, 500);
/// stats.complete_piece_drop(4);
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 600);
/// assert_eq!(stats.level(), 2);
/// assert_eq!(stats.cleared_lines(), 6);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score_per_line: u64,
    level_up_score: u64,
    score: u64,
    completed_pieces: usize,
    cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    /// Creates a tracker with all counters at zero.
    #[must_use]
    pub const fn new(score_per_line: u64, level_up_score: u64) -> Self {
        Self {
            score_per_line,
            level_up_score,
            score: 0,
            completed_pieces: 0,
            cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u64 {
        self.score / self.level_up_score + 1
    }

    /// Returns the total number of pieces that have been locked.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the total number of rows cleared.
    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index `n` counts locks that cleared `n` rows; `[0]` is locks that
    /// cleared nothing.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks.
    ///
    /// Adds `cleared_lines * score_per_line` to the score in one step and
    /// returns the points awarded.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> u64 {
        self.completed_pieces += 1;
        self.cleared_lines += cleared_lines;
        if let Some(counter) = self.line_cleared_counter.get_mut(cleared_lines) {
            *counter += 1;
        }
        let points = (cleared_lines as u64).saturating_mul(self.score_per_line);
        self.score = self.score.saturating_add(points);
        points
    }
}
