use blockfall_engine::{Cell, ShapeKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// One board cell, two terminal columns wide.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::new(style::EMPTY_DOT, "."),
            Cell::Locked => Self::new(style::LOCKED, ""),
            Cell::Active(kind) => {
                let style = match kind {
                    ShapeKind::I => style::I_BLOCK,
                    ShapeKind::O => style::O_BLOCK,
                    ShapeKind::S => style::S_BLOCK,
                    ShapeKind::Z => style::Z_BLOCK,
                    ShapeKind::J => style::J_BLOCK,
                    ShapeKind::L => style::L_BLOCK,
                    ShapeKind::T => style::T_BLOCK,
                };
                Self::new(style, "")
            }
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
