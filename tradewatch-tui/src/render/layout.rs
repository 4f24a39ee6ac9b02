use ratatui::layout::Rect;

/// Border/separator columns shared between the three panels.
pub const PANEL_SEPARATORS: u16 = 3;

/// Screen areas for one redraw, derived from the terminal size. Never cached.
///
/// Each panel has a logical width `w` (the configured pane width) and occupies `w + 1` cells:
/// the outline sits on local columns `0` and `w`, content on `1..w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub header: Rect,
    pub volume: Rect,
    pub candles: Rect,
    pub trades: Rect,
    pub candle_width: u16,
}

impl PanelGeometry {
    /// Price panel width left over once the fixed-width panels and separators are placed.
    pub fn candle_width(terminal_width: u16, volume_width: u16, trade_width: u16) -> u16 {
        terminal_width.saturating_sub(
            volume_width
                .saturating_add(trade_width)
                .saturating_add(PANEL_SEPARATORS),
        )
    }

    /// Lay out the header row and the volume | price | trades panels inside `area`.
    pub fn compute(area: Rect, volume_width: u16, trade_width: u16) -> Self {
        let candle_width = Self::candle_width(area.width, volume_width, trade_width);
        let top = area.y.saturating_add(1);
        let height = area.height.saturating_sub(1);

        let volume_x = area.x;
        let candles_x = volume_x.saturating_add(volume_width).saturating_add(1);
        let trades_x = candles_x.saturating_add(candle_width).saturating_add(1);

        let panel = |x: u16, width: u16| {
            Rect::new(x, top, width.saturating_add(1), height).intersection(area)
        };

        Self {
            header: Rect::new(area.x, area.y, area.width, area.height.min(1)),
            volume: panel(volume_x, volume_width),
            candles: panel(candles_x, candle_width),
            trades: panel(trades_x, trade_width),
            candle_width,
        }
    }
}

/// Number of content rows inside a panel of the given outer height.
pub fn content_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(2))
}
