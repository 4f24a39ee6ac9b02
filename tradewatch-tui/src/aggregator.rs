//! Time-windowed OHLC aggregation of the live trade stream.
//!
//! Trades are routed by their own timestamps (not wall clock) into fixed-duration buckets
//! aligned to `floor(timestamp / window) * window`. Both the trade ledger and the bucket
//! sequence are bounded: only the most recent rows are ever rendered.

use chrono::{DateTime, Utc};
use std::{collections::VecDeque, time::Duration};
use tradewatch_data::TradeEvent;

/// One fixed-length time window of trades.
///
/// `low <= price <= high` for every trade routed into the bucket; `open` is the first routed
/// price and `close` the most recent.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub trade_count: u64,
    pub window_start: DateTime<Utc>,
    pub window: Duration,
}

impl Bucket {
    /// Open a bucket seeded from its first trade.
    fn open(trade: &TradeEvent, window_start: DateTime<Utc>, window: Duration) -> Self {
        Self {
            open: trade.price,
            close: trade.price,
            high: trade.price,
            low: trade.price,
            trade_count: 1,
            window_start,
            window,
        }
    }

    fn update(&mut self, price: f64) {
        self.close = price;
        self.trade_count += 1;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
    }

    /// Close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// How a single trade changed the bucket sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Folded into the current last bucket.
    Extended,
    /// Started a new bucket.
    Opened,
    /// Older than the last bucket's window: kept in the ledger only.
    Late,
}

/// Owns the trade ledger and bucket sequence. Single mutator, no locking.
#[derive(Debug, Clone)]
pub struct Aggregator {
    window: Duration,
    capacity: usize,
    trades: VecDeque<TradeEvent>,
    buckets: VecDeque<Bucket>,
}

impl Aggregator {
    pub fn new(window: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: window.max(Duration::from_millis(1)),
            capacity,
            trades: VecDeque::with_capacity(capacity),
            buckets: VecDeque::with_capacity(capacity),
        }
    }

    /// Trade ledger, oldest first.
    pub fn trades(&self) -> &VecDeque<TradeEvent> {
        &self.trades
    }

    /// Bucket sequence, strictly increasing by `window_start`.
    pub fn buckets(&self) -> &VecDeque<Bucket> {
        &self.buckets
    }

    /// Start of the window containing `time`.
    pub fn window_start(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        let window_ms = i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX);
        let start_ms = time.timestamp_millis().div_euclid(window_ms) * window_ms;
        DateTime::from_timestamp_millis(start_ms).unwrap_or(time)
    }

    /// Record a trade in the ledger and route it into its bucket.
    pub fn ingest(&mut self, trade: TradeEvent) -> IngestOutcome {
        let key = self.window_start(trade.time);
        push_bounded(&mut self.trades, trade, self.capacity);

        match self.buckets.back_mut() {
            Some(last) if last.window_start == key => {
                last.update(trade.price);
                IngestOutcome::Extended
            }
            Some(last) if key < last.window_start => {
                tracing::debug!(
                    trade_time = %trade.time,
                    bucket_start = %last.window_start,
                    "late trade kept in ledger only"
                );
                IngestOutcome::Late
            }
            _ => {
                let bucket = Bucket::open(&trade, key, self.window);
                push_bounded(&mut self.buckets, bucket, self.capacity);
                IngestOutcome::Opened
            }
        }
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, capacity: usize) {
    if queue.len() >= capacity {
        queue.pop_front();
    }
    queue.push_back(item);
}
