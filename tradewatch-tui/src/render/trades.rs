use super::{content_rows, draw_outline, has_interior, side_color};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use std::collections::VecDeque;
use tradewatch_data::TradeEvent;

/// Most recent trades, newest on top, coloured by side.
#[derive(Debug, Clone, Copy)]
pub struct TradeLedger<'a> {
    trades: &'a VecDeque<TradeEvent>,
}

impl<'a> TradeLedger<'a> {
    pub fn new(trades: &'a VecDeque<TradeEvent>) -> Self {
        Self { trades }
    }
}

impl Widget for TradeLedger<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !has_interior(area) {
            return;
        }
        draw_outline(area, buf, "Trades");

        let max_width = usize::from(area.width - 2);
        let rows = content_rows(area);

        for (row, trade) in (1..).zip(self.trades.iter().rev().take(rows)) {
            let line = format!("{:<4} {:.2}", trade.side, trade.price);
            let style = Style::default()
                .fg(side_color(trade.side))
                .add_modifier(Modifier::BOLD);
            buf.set_stringn(area.x + 1, area.y + row, line, max_width, style);
        }
    }
}
