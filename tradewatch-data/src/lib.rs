//! # Tradewatch-Data
//! Streaming ingestion for a single crypto/fiat pair from the Coinbase Exchange ticker feed.
//!
//! * **Resilient**: reconnects after any dial, read or idle-timeout failure using a capped,
//!   jittered quadratic backoff.
//! * **Normalised**: handshake artefacts and malformed messages are discarded; only validated
//!   [`TradeEvent`]s with strictly positive prices reach the consumer.
//! * **Backpressured**: trades are pushed into a bounded channel, so a slow consumer slows the
//!   reader rather than growing memory.
//!
//! ## Example
//! ```rust,no_run
//! use tradewatch_data::{Pair, StreamConfig, StreamConnector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let config = StreamConfig::new(Pair::new("BTC", "USD"));
//!     let mut feed = StreamConnector::new(config).start(shutdown_rx);
//!
//!     while let Some(trade) = feed.trades.recv().await {
//!         println!("{} {:.2} @ {}", trade.side, trade.price, trade.time);
//!     }
//! }
//! ```

/// All [`Error`](std::error::Error)s generated in Tradewatch-Data.
pub mod error;

/// Market data model: [`Side`], [`TradeEvent`], [`Pair`] and [`ConnectionStatus`].
pub mod model;

/// Exchange specific wire codecs.
pub mod exchange;

/// Reconnect backoff policy.
pub mod backoff;

/// Stream wrappers.
pub mod streams;

/// [`StreamConnector`] and its [`StreamConfig`].
pub mod connector;

pub use backoff::{BackoffPolicy, ReconnectBackoff};
pub use connector::{FeedChannels, StreamConfig, StreamConnector};
pub use error::DataError;
pub use model::{ConnectionStatus, Pair, Side, TradeEvent};
