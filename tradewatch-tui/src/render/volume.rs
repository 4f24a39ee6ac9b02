use super::{C_LEGEND, C_VOLUME, VolumeScale, content_rows, draw_outline, has_interior};
use crate::aggregator::Bucket;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use std::collections::VecDeque;

/// Trade-count histogram aligned row-for-row with the candlestick panel.
#[derive(Debug, Clone, Copy)]
pub struct VolumeHistogram<'a> {
    buckets: &'a VecDeque<Bucket>,
}

impl<'a> VolumeHistogram<'a> {
    pub fn new(buckets: &'a VecDeque<Bucket>) -> Self {
        Self { buckets }
    }
}

impl Widget for VolumeHistogram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !has_interior(area) {
            return;
        }
        draw_outline(area, buf, "Volume");

        let width = area.width - 1;
        let rows = content_rows(area);
        let visible = || self.buckets.iter().rev().take(rows);
        let scale = VolumeScale::new(visible(), width);

        if scale.max > 0 {
            let label = scale.max.to_string();
            let len = u16::try_from(label.len()).unwrap_or(u16::MAX);
            if len < width {
                buf.set_string(
                    area.x + width - len,
                    area.bottom() - 1,
                    &label,
                    Style::default().fg(C_LEGEND),
                );
            }
        }

        for (row, bucket) in (1..).zip(visible()) {
            let Some(end) = scale.bar_end(bucket.trade_count) else {
                continue;
            };
            for x in 1..=end {
                buf[(area.x + x, area.y + row)]
                    .set_symbol("█")
                    .set_fg(C_VOLUME);
            }
        }
    }
}
