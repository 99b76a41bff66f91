use serde::{Deserialize, Serialize};

use crate::{
    MoveError, PieceCollisionError,
    core::Board,
};

use super::{
    ActivePiece, ConfigError, EngineConfig, EngineSnapshot, GameStats, PieceGenerator, PieceSeed,
    RenderGrid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::IsVariant)]
pub enum GameStatus {
    NotStarted,
    Running,
    GameOver,
}

/// Abstract player input. Hosts map their own key events onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCw,
    SoftDropOn,
    SoftDropOff,
}

/// What a single [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The game is not running; nothing changed.
    Idle,
    /// The active piece moved down one row.
    Moved,
    /// The active piece locked and a new one spawned.
    Locked { cleared_lines: usize },
    /// The active piece locked and the next one could not spawn.
    GameOver { cleared_lines: usize },
}

/// The falling-block game state machine.
///
/// Driven by two stimuli from the host: [`tick`](Self::tick) on a timer and
/// [`command`](Self::command) on player input. The engine never schedules
/// anything itself; the host reads [`tick_interval`](Self::tick_interval)
/// after every event to decide when the next tick is due.
///
/// The falling piece is kept apart from the board and checked against it
/// at its candidate position; it becomes part of the board only when it
/// locks.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, Engine, EngineConfig, GameStatus, PieceSeed, TickOutcome};
///
/// let mut engine = Engine::with_seed(EngineConfig::default(), PieceSeed::from(1_u128)).unwrap();
/// assert_eq!(engine.status(), GameStatus::NotStarted);
/// assert_eq!(engine.tick(), TickOutcome::Idle);
///
/// engine.start();
/// assert!(engine.status().is_running());
/// assert!(engine.command(Command::SoftDropOn));
/// assert_eq!(engine.tick_interval(), 50);
///
/// while engine.tick().is_moved() {}
/// assert_eq!(engine.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    board: Board,
    active_piece: Option<ActivePiece>,
    stats: GameStats,
    status: GameStatus,
    soft_drop: bool,
    generator: PieceGenerator,
}

impl Engine {
    /// Creates an engine with a random seed.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::new())
    }

    /// Creates an engine whose piece sequence is determined by `seed`.
    pub fn with_seed(config: EngineConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::with_seed(seed))
    }

    /// Creates an engine whose first game is played on a prepared board.
    ///
    /// The board must match the configured dimensions. [`restart`](Self::restart)
    /// still begins from an empty board.
    pub fn with_board(
        config: EngineConfig,
        seed: PieceSeed,
        board: Board,
    ) -> Result<Self, ConfigError> {
        let mut engine = Self::with_seed(config, seed)?;
        if (board.width(), board.height()) != (engine.board.width(), engine.board.height()) {
            return Err(ConfigError::BoardSizeMismatch {
                expected_width: engine.board.width(),
                expected_height: engine.board.height(),
                width: board.width(),
                height: board.height(),
            });
        }
        engine.board = board;
        Ok(engine)
    }

    fn with_generator(config: EngineConfig, generator: PieceGenerator) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.board_width, config.board_height)?;
        let stats = GameStats::new(config.score_per_line, config.level_up_score);
        Ok(Self {
            config,
            board,
            active_piece: None,
            stats,
            status: GameStatus::NotStarted,
            soft_drop: false,
            generator,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece; `None` before the first start and after game over.
    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active_piece.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> u64 {
        self.stats.level()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_soft_drop(&self) -> bool {
        self.soft_drop
    }

    /// Drop interval for the current level, ignoring soft drop.
    #[must_use]
    pub fn drop_interval(&self) -> u64 {
        self.config.drop_interval(self.level())
    }

    /// Interval the host should wait before the next [`tick`](Self::tick).
    ///
    /// While soft drop is on this is the soft-drop interval, unless the level
    /// has already made the normal drop faster than that.
    #[must_use]
    pub fn tick_interval(&self) -> u64 {
        let drop_interval = self.drop_interval();
        if self.soft_drop {
            drop_interval.min(self.config.soft_drop_interval)
        } else {
            drop_interval
        }
    }

    /// Board and falling piece composed for drawing.
    #[must_use]
    pub fn render_grid(&self) -> RenderGrid {
        RenderGrid::new(&self.board, self.active_piece.as_ref())
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            status: self.status,
            seed: self.seed(),
            board: self.board.clone(),
            active_piece: self.active_piece,
            score: self.score(),
            level: self.level(),
            cleared_lines: self.stats.cleared_lines(),
            completed_pieces: self.stats.completed_pieces(),
            soft_drop: self.soft_drop,
            tick_interval: self.tick_interval(),
        }
    }

    /// Starts the first game. Ignored unless the game has not started yet.
    ///
    /// Plays on the board given at construction (empty unless
    /// [`with_board`](Self::with_board) was used).
    pub fn start(&mut self) {
        if !self.status.is_not_started() {
            return;
        }
        self.status = GameStatus::Running;
        self.spawn_next();
    }

    /// Throws away the current game and starts a new one on an empty board.
    ///
    /// Allowed from any state. The piece sequence continues from where the
    /// previous game left it.
    pub fn restart(&mut self) {
        self.board.clear();
        self.stats = GameStats::new(self.config.score_per_line, self.config.level_up_score);
        self.soft_drop = false;
        self.status = GameStatus::Running;
        self.spawn_next();
    }

    /// Advances the game by one step of gravity.
    ///
    /// Moves the active piece down one row, or locks it if it cannot move.
    /// Locking merges the piece into the board, clears full rows, awards
    /// the score and spawns the next piece. A spawn that does not fit ends
    /// the game without touching the board again.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.status.is_running() {
            return TickOutcome::Idle;
        }
        match self.try_move_down() {
            Ok(()) => TickOutcome::Moved,
            Err(MoveError::NoActivePiece) => TickOutcome::Idle,
            Err(MoveError::PieceCollision(_)) => self.lock_active_piece(),
        }
    }

    /// Applies a player command and reports whether anything changed.
    ///
    /// Moves and rotations that do not fit are ignored, as is every command
    /// while the game is not running.
    pub fn command(&mut self, command: Command) -> bool {
        if !self.status.is_running() {
            return false;
        }
        match command {
            Command::MoveLeft => self.try_move_left().is_ok(),
            Command::MoveRight => self.try_move_right().is_ok(),
            Command::RotateCw => self.try_rotate_clockwise().is_ok(),
            Command::SoftDropOn => !std::mem::replace(&mut self.soft_drop, true),
            Command::SoftDropOff => std::mem::replace(&mut self.soft_drop, false),
        }
    }

    /// Replaces the active piece if it fits on the board.
    pub fn set_active_piece(&mut self, piece: ActivePiece) -> Result<(), PieceCollisionError> {
        if !piece.fits(&self.board) {
            return Err(PieceCollisionError);
        }
        self.active_piece = Some(piece);
        Ok(())
    }

    fn try_replace_active_piece(
        &mut self,
        f: impl FnOnce(&ActivePiece) -> ActivePiece,
    ) -> Result<(), MoveError> {
        let piece = self.active_piece.as_ref().ok_or(MoveError::NoActivePiece)?;
        let piece = f(piece);
        self.set_active_piece(piece)?;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_replace_active_piece(ActivePiece::left)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_replace_active_piece(ActivePiece::right)
    }

    pub fn try_move_down(&mut self) -> Result<(), MoveError> {
        self.try_replace_active_piece(ActivePiece::down)
    }

    /// Rotates the active piece clockwise in place. No kicks are tried.
    pub fn try_rotate_clockwise(&mut self) -> Result<(), MoveError> {
        self.try_replace_active_piece(ActivePiece::rotated_clockwise)
    }

    fn lock_active_piece(&mut self) -> TickOutcome {
        let Some(piece) = self.active_piece.take() else {
            return TickOutcome::Idle;
        };
        self.board.merge(piece.shape(), piece.position());
        let cleared_lines = self.board.clear_full_rows();
        self.stats.complete_piece_drop(cleared_lines);

        if self.spawn_next() {
            TickOutcome::Locked { cleared_lines }
        } else {
            TickOutcome::GameOver { cleared_lines }
        }
    }

    /// Spawns the next piece at the top center, or ends the game if it does
    /// not fit. Returns whether the game is still running.
    fn spawn_next(&mut self) -> bool {
        let piece = ActivePiece::spawn(self.generator.next_shape(), &self.board);
        if self.set_active_piece(piece).is_err() {
            self.active_piece = None;
            self.status = GameStatus::GameOver;
            return false;
        }
        true
    }
}
