use super::{C_BUY, C_LEGEND, C_SELL, PriceScale, content_rows, draw_outline, has_interior};
use crate::aggregator::Bucket;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use std::collections::VecDeque;

const WICK: &str = "─";
const BODY: &str = "█";

/// Candlestick panel: one row per bucket, newest on top, price increasing left to right.
#[derive(Debug, Clone, Copy)]
pub struct CandleChart<'a> {
    buckets: &'a VecDeque<Bucket>,
}

impl<'a> CandleChart<'a> {
    pub fn new(buckets: &'a VecDeque<Bucket>) -> Self {
        Self { buckets }
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !has_interior(area) {
            return;
        }
        draw_outline(area, buf, "Price");

        let width = area.width - 1;
        let rows = content_rows(area);
        let visible = || self.buckets.iter().rev().take(rows);

        let Some(scale) = PriceScale::new(visible(), width) else {
            return;
        };

        let legend = Style::default().fg(C_LEGEND);
        let lower = format!("{:.2}", scale.lower);
        let upper = format!("{:.2}", scale.upper);
        buf.set_stringn(area.x + 1, area.y, &lower, usize::from(width - 1), legend);
        let upper_len = u16::try_from(upper.len()).unwrap_or(u16::MAX);
        if upper_len < width {
            buf.set_string(area.x + width - upper_len, area.y, &upper, legend);
        }

        for (row, bucket) in (1..).zip(visible()) {
            let y = area.y + row;
            let color = if bucket.is_bearish() { C_SELL } else { C_BUY };

            for x in scale.cells(bucket.low, bucket.high) {
                buf[(area.x + x, y)].set_symbol(WICK).set_fg(color);
            }
            for x in scale.cells(bucket.open, bucket.close) {
                buf[(area.x + x, y)].set_symbol(BODY).set_fg(color);
            }
        }
    }
}
