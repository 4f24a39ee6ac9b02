/// Core data types for market events
///
/// A [`TradeEvent`] is created once on receipt from the feed and never mutated afterwards.
use chrono::{DateTime, Utc};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Order side (buy or sell) of the taker that triggered a trade.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Convert to display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single executed trade.
///
/// Prices are strictly positive and finite; the feed codec discards anything else.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Constructor)]
pub struct TradeEvent {
    pub side: Side,
    pub price: f64,
    pub time: DateTime<Utc>,
}

/// Crypto/fiat trading pair, eg/ `BTC-USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
#[display("{crypto}-{fiat}")]
pub struct Pair {
    pub crypto: SmolStr,
    pub fiat: SmolStr,
}

impl Pair {
    /// Construct a new [`Pair`], normalising both symbols to upper case.
    pub fn new<C, F>(crypto: C, fiat: F) -> Self
    where
        C: AsRef<str>,
        F: AsRef<str>,
    {
        Self {
            crypto: SmolStr::new(crypto.as_ref().trim().to_uppercase()),
            fiat: SmolStr::new(fiat.as_ref().trim().to_uppercase()),
        }
    }
}

/// Connection status updates published by the [`StreamConnector`](crate::StreamConnector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Dialing the feed for the first time.
    #[default]
    Connecting,
    Connected,
    /// Waiting out a backoff delay after a failure.
    Reconnecting,
    /// The connector has stopped.
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "live",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::Disconnected => "offline",
        }
    }
}
