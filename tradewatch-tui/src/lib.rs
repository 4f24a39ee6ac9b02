//! # Tradewatch-Tui
//! Terminal dashboard for one crypto/fiat pair: a trade ledger, a candlestick chart and a
//! per-candle volume histogram, repainted as trades arrive from [`tradewatch_data`].
//!
//! The foreground loop in [`app`] owns all state; the feed connector and the terminal input
//! reader only ever push events to it.

/// Foreground event loop and [`Dashboard`](app::Dashboard) state.
pub mod app;

/// Time-windowed OHLC aggregation.
pub mod aggregator;

/// Command line and configuration values.
pub mod config;

/// All [`Error`](std::error::Error)s generated in Tradewatch-Tui.
pub mod error;

/// Terminal input reader thread.
pub mod input;

/// Optional file logging.
pub mod logging;

/// Dashboard widgets and panel geometry.
pub mod render;

/// Terminal setup and teardown.
pub mod terminal;

pub use aggregator::{Aggregator, Bucket, IngestOutcome};
pub use app::{AppEvent, Control, Dashboard};
pub use config::{Cli, DashboardConfig};
pub use error::DashboardError;
