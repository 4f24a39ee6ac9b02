use super::{C_BORDER, C_BUY, C_SELL, C_WARN};
use crate::config::{DashboardConfig, short_duration};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use tradewatch_data::ConnectionStatus;

/// Top row: active pair, exchange, candle size and feed status.
#[derive(Debug, Clone, Copy)]
pub struct Header<'a> {
    config: &'a DashboardConfig,
    status: ConnectionStatus,
}

impl<'a> Header<'a> {
    pub fn new(config: &'a DashboardConfig, status: ConnectionStatus) -> Self {
        Self { config, status }
    }

    pub fn title(&self) -> String {
        format!(
            "Crypto: {}   Fiat: {}   Exchange: {}   Candle Size: {}",
            self.config.pair.crypto,
            self.config.pair.fiat,
            self.config.exchange,
            short_duration(self.config.candle_window)
        )
    }
}

fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Connected => C_BUY,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting => C_WARN,
        ConnectionStatus::Disconnected => C_SELL,
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let title = self.title();
        buf.set_stringn(
            area.x,
            area.y,
            &title,
            usize::from(area.width),
            Style::default().fg(C_BORDER),
        );

        let status = format!("● {}", self.status.label());
        let status_len = u16::try_from(status.chars().count()).unwrap_or(u16::MAX);
        let title_len = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);

        // Status only when it fits beside the title.
        if title_len.saturating_add(status_len).saturating_add(1) <= area.width {
            buf.set_string(
                area.right() - status_len,
                area.y,
                &status,
                Style::default().fg(status_color(self.status)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_utils::row;
    use std::time::Duration;
    use tradewatch_data::Pair;

    #[test]
    fn test_header_title() {
        struct TestCase {
            window: Duration,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: default window
                window: Duration::from_secs(900),
                expected: "Crypto: ETH   Fiat: EUR   Exchange: Coinbase   Candle Size: 15m",
            },
            TestCase {
                // TC1: whole hour
                window: Duration::from_secs(3600),
                expected: "Crypto: ETH   Fiat: EUR   Exchange: Coinbase   Candle Size: 1h",
            },
            TestCase {
                // TC2: seconds
                window: Duration::from_secs(30),
                expected: "Crypto: ETH   Fiat: EUR   Exchange: Coinbase   Candle Size: 30s",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let config = DashboardConfig::new(Pair::new("eth", "eur"))
                .with_candle_window(test.window)
                .unwrap();
            let header = Header::new(&config, ConnectionStatus::Connected);
            assert_eq!(header.title(), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_status_right_aligned_and_coloured() {
        let config = DashboardConfig::new(Pair::new("BTC", "USD"));

        for (status, label, color) in [
            (ConnectionStatus::Connecting, "● connecting", C_WARN),
            (ConnectionStatus::Connected, "● live", C_BUY),
            (ConnectionStatus::Reconnecting, "● reconnecting", C_WARN),
            (ConnectionStatus::Disconnected, "● offline", C_SELL),
        ] {
            let mut buf = Buffer::empty(Rect::new(0, 0, 90, 1));
            Header::new(&config, status).render(buf.area, &mut buf);

            assert!(row(&buf, 0).ends_with(label), "{status:?}");
            assert_eq!(buf[(89, 0)].fg, color, "{status:?}");
        }
    }

    #[test]
    fn test_narrow_header_drops_status() {
        let config = DashboardConfig::new(Pair::new("BTC", "USD"));
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 1));
        Header::new(&config, ConnectionStatus::Connected).render(buf.area, &mut buf);

        assert_eq!(row(&buf, 0), "Crypto: BTC   Fiat: ");
    }
}
