use std::time::Duration;

use blockfall_engine::{Engine, GameStatus};
use blockfall_runtime::{App, RenderMode, Runtime};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use super::keymap::{self, KeyAction};
use crate::ui::widgets::GameDisplay;

#[derive(Debug)]
pub struct PlayApp {
    engine: Engine,
    fps: f64,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(engine: Engine, fps: f64) -> Self {
        Self {
            engine,
            fps,
            is_exiting: false,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Game(command) => _ = self.engine.command(command),
            KeyAction::Start => self.engine.start(),
            KeyAction::Restart => self.engine.restart(),
            KeyAction::Quit => self.is_exiting = true,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(self.fps));
        runtime.set_report_key_release(true);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(key) = event.as_key_event() {
            for action in keymap::key_actions(&key, self.engine.is_soft_drop()) {
                self.apply(action);
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let display = GameDisplay::new(&self.engine);
        let help_text = match self.engine.status() {
            GameStatus::NotStarted => "Controls: Enter (Start) | Q (Quit)",
            GameStatus::Running => {
                "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | R (Restart) | Q (Quit)"
            }
            GameStatus::GameOver => "Controls: R (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(display.height()), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn tick(&mut self) {
        self.engine.tick();
    }

    fn tick_interval(&self) -> Option<Duration> {
        self.engine
            .status()
            .is_running()
            .then(|| Duration::from_millis(self.engine.tick_interval()))
    }
}
