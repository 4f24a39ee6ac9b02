//! Command line surface and the immutable configuration values derived from it.
//!
//! Everything is parsed and validated once at startup; the resulting [`DashboardConfig`] and
//! [`StreamConfig`] are passed by value into the components that need them.

use crate::error::DashboardError;
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use tradewatch_data::{
    BackoffPolicy, Pair, StreamConfig, exchange::coinbase,
};
use url::Url;

/// Default candle window (15 minutes).
pub const DEFAULT_CANDLE_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of trades and buckets retained.
pub const DEFAULT_HISTORY_ROWS: usize = 500;

/// Live terminal dashboard of trades, candlesticks and volume for one crypto/fiat pair.
#[derive(Debug, Clone, Parser)]
#[command(name = "tradewatch", version, about)]
pub struct Cli {
    /// Crypto to show, eg/ BTC, ETH, LTC.
    #[arg(long, env = "TRADEWATCH_CRYPTO", default_value = "BTC")]
    pub crypto: String,

    /// Fiat currency to show, eg/ USD, EUR, GBP.
    #[arg(long, env = "TRADEWATCH_FIAT", default_value = "USD")]
    pub fiat: String,

    /// Candlestick window size, eg/ 30s, 5m, 1h30m.
    #[arg(long, default_value = "15m", value_parser = parse_duration)]
    pub candle_size: Duration,

    /// Width of the volume pane.
    #[arg(long, default_value_t = 11)]
    pub volume_width: u16,

    /// Width of the trade pane.
    #[arg(long, default_value_t = 14)]
    pub trade_width: u16,

    /// Websocket feed URL.
    #[arg(long, env = "TRADEWATCH_FEED_URL", default_value = coinbase::BASE_URL_COINBASE)]
    pub feed_url: String,

    /// Number of trades and candles kept in memory.
    #[arg(long, default_value_t = DEFAULT_HISTORY_ROWS)]
    pub history_rows: usize,

    /// Upper bound on the delay between reconnect attempts.
    #[arg(long, default_value = "60s", value_parser = parse_duration)]
    pub max_backoff: Duration,

    /// Write logs to this file (filtered by RUST_LOG).
    #[arg(long, env = "TRADEWATCH_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Validate the parsed arguments and split them into per-component configuration.
    pub fn into_configs(self) -> Result<(DashboardConfig, StreamConfig), DashboardError> {
        if self.crypto.trim().is_empty() || self.fiat.trim().is_empty() {
            return Err(DashboardError::Config(
                "crypto and fiat symbols must not be empty".to_string(),
            ));
        }
        if self.volume_width < 2 || self.trade_width < 2 {
            return Err(DashboardError::Config(format!(
                "panel widths must be at least 2, got volume {} and trade {}",
                self.volume_width, self.trade_width
            )));
        }
        if self.history_rows == 0 {
            return Err(DashboardError::Config(
                "history rows must be at least 1".to_string(),
            ));
        }
        Url::parse(&self.feed_url).map_err(|error| {
            DashboardError::Config(format!("invalid feed url {}: {error}", self.feed_url))
        })?;

        let pair = Pair::new(&self.crypto, &self.fiat);

        let dashboard = DashboardConfig::new(pair.clone())
            .with_candle_window(self.candle_size)?
            .with_panel_widths(self.volume_width, self.trade_width)
            .with_history_capacity(self.history_rows);

        let stream = StreamConfig::new(pair)
            .with_url(self.feed_url)
            .with_backoff(BackoffPolicy::default().with_max_delay(self.max_backoff));

        Ok((dashboard, stream))
    }
}

/// Immutable dashboard configuration shared by the aggregator and renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub pair: Pair,
    pub exchange: String,
    pub candle_window: Duration,
    pub volume_width: u16,
    pub trade_width: u16,
    pub history_capacity: usize,
}

impl DashboardConfig {
    pub fn new(pair: Pair) -> Self {
        Self {
            pair,
            exchange: coinbase::EXCHANGE_NAME.to_string(),
            candle_window: DEFAULT_CANDLE_WINDOW,
            volume_width: 11,
            trade_width: 14,
            history_capacity: DEFAULT_HISTORY_ROWS,
        }
    }

    pub fn with_candle_window(mut self, window: Duration) -> Result<Self, DashboardError> {
        if window.as_millis() == 0 {
            return Err(DashboardError::Config(format!(
                "candle size must be at least 1ms, got {window:?}"
            )));
        }
        self.candle_window = window;
        Ok(self)
    }

    pub fn with_panel_widths(mut self, volume_width: u16, trade_width: u16) -> Self {
        self.volume_width = volume_width;
        self.trade_width = trade_width;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }
}

/// Parse a duration such as `15m`, `1h30m`, `45s` or `250ms`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = input;

    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("expected a number in duration {input:?}"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|error| format!("invalid number in duration {input:?}: {error}"))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let component = match &rest[..unit_len] {
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "s" => Duration::from_secs(value),
            "ms" => Duration::from_millis(value),
            "" => return Err(format!("missing unit in duration {input:?}")),
            unit => return Err(format!("unknown unit {unit:?} in duration {input:?}")),
        };
        rest = &rest[unit_len..];
        total = total.saturating_add(component);
    }

    if total.is_zero() {
        return Err(format!("duration {input:?} must be greater than zero"));
    }

    Ok(total)
}

/// Render a duration in abbreviated form with trailing zero units elided.
///
/// `15m` stays `15m`, `1h` stays `1h`, `1h30m` stays `1h30m`, `90s` becomes `1m30s`.
pub fn short_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        return format!("{millis}ms");
    }

    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let seconds = if millis > 0 {
        let fraction = format!("{millis:03}");
        format!("{seconds}.{}s", fraction.trim_end_matches('0'))
    } else {
        format!("{seconds}s")
    };

    let mut text = if hours > 0 {
        format!("{hours}h{minutes}m{seconds}")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}")
    } else {
        seconds
    };

    if text.ends_with("m0s") {
        text.truncate(text.len() - 2);
    }
    if text.ends_with("h0m") {
        text.truncate(text.len() - 2);
    }
    text
}
