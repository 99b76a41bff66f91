use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for terminal games.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Called once at the start of `Runtime::run()`, before the terminal is
    /// set up. Use this to configure the render mode.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, event: Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances game logic by one tick.
    fn tick(&mut self);

    /// Time until the next tick is due, or `None` to stop ticking.
    ///
    /// Queried before waiting for every event. A shorter interval takes
    /// effect immediately; when ticking resumes after `None`, the first tick
    /// comes one full interval later.
    fn tick_interval(&self) -> Option<Duration>;
}
