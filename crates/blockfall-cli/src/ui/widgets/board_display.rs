use blockfall_engine::RenderGrid;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Draws a [`RenderGrid`]: locked cells and the falling piece.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: RenderGrid,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: RenderGrid) -> Self {
        Self { grid, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn grid_width(&self) -> u16 {
        u16::try_from(self.grid.width())
            .unwrap_or(u16::MAX)
            .saturating_mul(CellDisplay::WIDTH)
    }

    fn grid_height(&self) -> u16 {
        u16::try_from(self.grid.height())
            .unwrap_or(u16::MAX)
            .saturating_mul(CellDisplay::HEIGHT)
    }

    pub fn width(&self) -> u16 {
        self.grid_width()
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        self.grid_height()
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self
            .block
            .inner_if_some(area)
            .centered_horizontally(Constraint::Length(self.grid_width()));

        let cell_rect = |x: usize, y: usize| {
            let x = u16::try_from(x).ok()?.checked_mul(CellDisplay::WIDTH)?;
            let y = u16::try_from(y).ok()?.checked_mul(CellDisplay::HEIGHT)?;
            let rect = Rect::new(
                area.x.saturating_add(x),
                area.y.saturating_add(y),
                CellDisplay::WIDTH,
                CellDisplay::HEIGHT,
            );
            Some(rect.intersection(area)).filter(|rect| !rect.is_empty())
        };

        for (y, row) in self.grid.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(rect) = cell_rect(x, y) {
                    CellDisplay::from_cell(*cell).render(rect, buf);
                }
            }
        }
    }
}
