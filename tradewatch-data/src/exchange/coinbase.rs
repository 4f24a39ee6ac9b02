use crate::{
    error::DataError,
    model::{Pair, Side, TradeEvent},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// [`Coinbase`](self) exchange display name.
pub const EXCHANGE_NAME: &str = "Coinbase";

/// [`Coinbase`](self) websocket feed base url.
///
/// See docs: <https://docs.cdp.coinbase.com/exchange/docs/websocket-overview>
pub const BASE_URL_COINBASE: &str = "wss://ws-feed.exchange.coinbase.com";

/// Channel carrying one message per match on a product.
pub const CHANNEL_TICKER: &str = "ticker";

/// Subscribe request sent once per connection.
///
/// ```json
/// {"type":"subscribe","channels":[{"name":"ticker","product_ids":["BTC-USD"]}]}
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CoinbaseSubscribe {
    #[serde(rename = "type")]
    kind: &'static str,
    channels: Vec<CoinbaseChannel>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
struct CoinbaseChannel {
    name: &'static str,
    product_ids: Vec<String>,
}

impl CoinbaseSubscribe {
    /// Subscribe to the ticker channel of a single [`Pair`].
    pub fn ticker(pair: &Pair) -> Self {
        Self {
            kind: "subscribe",
            channels: vec![CoinbaseChannel {
                name: CHANNEL_TICKER,
                product_ids: vec![pair.to_string()],
            }],
        }
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        serde_json::to_string(self).map_err(|error| DataError::Serialise(error.to_string()))
    }
}

/// Any inbound message on the Coinbase websocket feed.
///
/// Only the fields needed to build a [`TradeEvent`] are kept. Everything is optional because
/// the feed interleaves `subscriptions` acks, the first (side-less) ticker snapshot and `error`
/// messages with the ticker stream.
///
/// ### Raw Payload Examples
/// See docs: <https://docs.cdp.coinbase.com/exchange/docs/websocket-channels#ticker-channel>
/// ```json
/// {
///     "type": "ticker",
///     "sequence": 37475248783,
///     "product_id": "BTC-USD",
///     "price": "67443.31",
///     "side": "buy",
///     "time": "2024-03-11T14:05:12.310146Z",
///     "trade_id": 614223411,
///     "last_size": "0.00020138"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CoinbaseMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default, deserialize_with = "de_opt_str_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CoinbaseMessage {
    /// Convert into a validated [`TradeEvent`].
    ///
    /// Returns `Ok(None)` for handshake artefacts (any message without a `side`).
    pub fn into_trade(self) -> Result<Option<TradeEvent>, DataError> {
        if self.kind == "error" {
            return Err(DataError::Exchange {
                message: self.message.unwrap_or_default(),
                reason: self.reason.unwrap_or_default(),
            });
        }

        let Some(side) = self.side else {
            return Ok(None);
        };

        let price = match self.price {
            Some(price) if price.is_finite() && price > 0.0 => price,
            Some(price) => {
                return Err(DataError::InvalidTrade(format!(
                    "price {price} is not strictly positive"
                )));
            }
            None => return Err(DataError::InvalidTrade("missing price".to_string())),
        };

        let time = self
            .time
            .ok_or_else(|| DataError::InvalidTrade("missing time".to_string()))?;

        Ok(Some(TradeEvent::new(side, price, time)))
    }
}

/// Parse a raw text frame from the feed.
pub fn parse_message(text: &str) -> Result<Option<TradeEvent>, DataError> {
    serde_json::from_str::<CoinbaseMessage>(text)
        .map_err(|error| DataError::Deserialise {
            error: error.to_string(),
            payload: text.to_string(),
        })?
        .into_trade()
}

/// Deserialize an optional decimal string (eg/ `"67443.31"`) as an `f64`.
fn de_opt_str_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|price| price.parse::<f64>().map_err(serde::de::Error::custom))
        .transpose()
}
