//! Full-repaint renderer: header row plus volume | price | trades panels.
//!
//! Every panel walks its data newest-first, filling rows top-down until the panel's row budget
//! runs out. Geometry is recomputed from the frame area on each draw.

mod candles;
mod header;
mod layout;
mod scale;
mod trades;
mod volume;

pub use candles::CandleChart;
pub use header::Header;
pub use layout::{PANEL_SEPARATORS, PanelGeometry, content_rows};
pub use scale::{MIN_PRICE_SPREAD, PRICE_PADDING, PriceScale, VolumeScale};
pub use trades::TradeLedger;
pub use volume::VolumeHistogram;

use crate::{aggregator::Aggregator, config::DashboardConfig};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use tradewatch_data::{ConnectionStatus, Side};

pub(crate) const C_BUY: Color = Color::Green;
pub(crate) const C_SELL: Color = Color::Red;
pub(crate) const C_BORDER: Color = Color::White;
pub(crate) const C_VOLUME: Color = Color::Blue;
pub(crate) const C_LEGEND: Color = Color::Green;
pub(crate) const C_WARN: Color = Color::Yellow;

/// Paint the whole dashboard into `frame`.
pub fn draw(
    frame: &mut Frame,
    config: &DashboardConfig,
    aggregator: &Aggregator,
    status: ConnectionStatus,
) {
    let geometry = PanelGeometry::compute(frame.area(), config.volume_width, config.trade_width);

    frame.render_widget(Header::new(config, status), geometry.header);
    frame.render_widget(VolumeHistogram::new(aggregator.buckets()), geometry.volume);
    frame.render_widget(CandleChart::new(aggregator.buckets()), geometry.candles);
    frame.render_widget(TradeLedger::new(aggregator.trades()), geometry.trades);
}

pub(crate) fn side_color(side: Side) -> Color {
    match side {
        Side::Buy => C_BUY,
        Side::Sell => C_SELL,
    }
}

/// Panels smaller than this in either dimension have no interior and are skipped.
pub(crate) fn has_interior(area: Rect) -> bool {
    area.width >= 3 && area.height >= 3
}

/// Draw the panel outline with `label` centred on the top border.
///
/// With logical width `w = area.width - 1` the label starts at `ceil(w / 2 - len / 2)`.
pub(crate) fn draw_outline(area: Rect, buf: &mut Buffer, label: &str) {
    Block::bordered()
        .border_style(Style::default().fg(C_BORDER))
        .render(area, buf);

    let column = header_column(area.width.saturating_sub(1), label.chars().count());
    buf.set_stringn(
        area.x + column,
        area.y,
        label,
        usize::from(area.width.saturating_sub(column)),
        Style::default().fg(C_BORDER),
    );
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn header_column(width: u16, label_len: usize) -> u16 {
    let column = (f64::from(width) / 2.0 - label_len as f64 / 2.0).ceil();
    column.max(0.0) as u16
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_utils::row;
    use chrono::{TimeZone, Utc};
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;
    use tradewatch_data::{Pair, TradeEvent};

    #[test]
    fn test_header_column() {
        assert_eq!(header_column(14, 6), 4);
        assert_eq!(header_column(11, 6), 3);
        assert_eq!(header_column(52, 5), 24);
        assert_eq!(header_column(3, 6), 0);
    }

    #[test]
    fn test_draw_outline() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 15, 4));
        draw_outline(buf.area, &mut buf, "Trades");

        assert_eq!(row(&buf, 0), "┌───Trades────┐");
        assert_eq!(row(&buf, 1), "│             │");
        assert_eq!(row(&buf, 3), "└─────────────┘");
    }

    #[test]
    fn test_draw_full_dashboard() {
        let config = DashboardConfig::new(Pair::new("BTC", "USD"));
        let mut aggregator = Aggregator::new(Duration::from_secs(60), 100);
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 14, 0, 0).unwrap();
        for (offset, price, side) in [
            (0, 100.0, Side::Buy),
            (10, 102.0, Side::Sell),
            (70, 98.0, Side::Sell),
            (80, 101.0, Side::Buy),
        ] {
            aggregator.ingest(TradeEvent::new(
                side,
                price,
                start + chrono::TimeDelta::seconds(offset),
            ));
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| draw(frame, &config, &aggregator, ConnectionStatus::Connected))
            .unwrap();
        let buf = terminal.backend().buffer();

        assert!(row(buf, 0).starts_with(
            "Crypto: BTC   Fiat: USD   Exchange: Coinbase   Candle Size: 15m"
        ));
        assert!(row(buf, 0).trim_end().ends_with("● live"));

        // Newest trade first in the ledger.
        let ledger_row: String = (66..79).map(|x| buf[(x, 2)].symbol()).collect();
        assert_eq!(ledger_row, "buy  101.00  ");
        assert_eq!(buf[(66, 2)].fg, C_BUY);
        let ledger_row: String = (66..79).map(|x| buf[(x, 4)].symbol()).collect();
        assert_eq!(ledger_row, "sell 102.00  ");
        assert_eq!(buf[(66, 4)].fg, C_SELL);

        // Two buckets of two trades each: both volume bars span the full interior.
        let volume_row: String = (0..12).map(|x| buf[(x, 2)].symbol()).collect();
        assert_eq!(volume_row, "│██████████│");
        assert_eq!(buf[(1, 2)].fg, C_VOLUME);
    }
}
