//! Game state machine and its supporting types.
//!
//! - [`Engine`] - board, falling piece, score and status, advanced by
//!   [`Engine::tick`] and [`Engine::command`]
//! - [`EngineConfig`] - board size, intervals and scoring constants
//! - [`GameStats`] - score, level and line-clear counters
//! - [`PieceGenerator`] / [`PieceSeed`] - seeded uniform piece selection
//! - [`RenderGrid`] / [`EngineSnapshot`] - state composed for hosts
//!
//! # Game Flow
//!
//! 1. Construct an [`Engine`] from an [`EngineConfig`] (and optionally a seed)
//! 2. [`Engine::start`] spawns the first piece
//! 3. The host calls [`Engine::tick`] every [`Engine::tick_interval`] units and
//!    forwards player input as [`Command`]s
//! 4. A piece that cannot fall further locks, full rows clear and the next
//!    piece spawns
//! 5. The game ends when a new piece does not fit; [`Engine::restart`] begins
//!    a new one
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, Engine, EngineConfig, PieceSeed, TickOutcome};
//!
//! let mut engine = Engine::with_seed(EngineConfig::default(), PieceSeed::from(3_u128)).unwrap();
//! engine.start();
//!
//! engine.command(Command::MoveLeft);
//! engine.command(Command::RotateCw);
//!
//! loop {
//!     match engine.tick() {
//!         TickOutcome::Moved => {}
//!         TickOutcome::Locked { cleared_lines } => {
//!             println!("locked, {cleared_lines} rows cleared");
//!             break;
//!         }
//!         TickOutcome::GameOver { .. } | TickOutcome::Idle => break,
//!     }
//! }
//! assert_eq!(engine.stats().completed_pieces(), 1);
//! ```

pub use self::{
    active_piece::*, config::*, game_engine::*, game_stats::*, piece_generator::*, render::*,
};

mod active_piece;
mod config;
mod game_engine;
mod game_stats;
mod piece_generator;
mod render;
