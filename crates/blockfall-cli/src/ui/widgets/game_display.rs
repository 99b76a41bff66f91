use blockfall_engine::{Engine, GameStatus};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, StatsDisplay, color, style};

/// Board and statistics side by side, with a banner over the board before
/// the game starts and after it ends.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    engine: &'a Engine,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.engine.status() {
            GameStatus::NotStarted => color::YELLOW,
            GameStatus::Running if self.engine.is_soft_drop() => color::CYAN,
            GameStatus::Running => color::WHITE,
            GameStatus::GameOver => color::RED,
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.engine.render_grid()).block(
            Block::bordered()
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    fn stats(&self) -> StatsDisplay<'a> {
        StatsDisplay::new(self.engine).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::symmetric(
                    self.horizontal_padding,
                    self.vertical_padding,
                ))
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        u16::max(self.board().height(), self.stats().height())
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board();
        let stats = self.stats();

        let [board_column, stats_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(board_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        let game_board_width = game_board.width();
        game_board.render(board_area, buf);
        stats.render(stats_area, buf);

        let popup = match self.engine.status() {
            GameStatus::Running => None,
            GameStatus::NotStarted => Some((
                "PRESS ENTER",
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            GameStatus::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
