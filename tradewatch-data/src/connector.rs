/// Resilient websocket connector for the Coinbase ticker feed
///
/// Maintains a single ticker subscription, forwards validated trades into a bounded channel
/// and reconnects with quadratic backoff after any failure.
use crate::{
    backoff::{BackoffPolicy, ReconnectBackoff},
    error::DataError,
    exchange::coinbase::{self, CoinbaseSubscribe},
    model::{ConnectionStatus, Pair, TradeEvent},
    streams::timeout::{DEFAULT_READ_TIMEOUT, TimeoutStream},
};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Default upper bound on a single dial attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default keep-alive ping interval.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest accepted ping interval. A zero period cannot drive a timer.
pub const MIN_PING_INTERVAL: Duration = Duration::from_millis(1);

/// Default capacity of the trade channel. A full channel blocks the reader.
pub const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 1024;

/// Feed connection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Websocket feed URL
    pub url: String,
    /// Pair to subscribe to
    pub pair: Pair,
    /// Delay policy between reconnect attempts
    pub backoff: BackoffPolicy,
    /// Upper bound on a single dial attempt
    pub connect_timeout: Duration,
    /// Reconnect if nothing is received for this long
    pub read_timeout: Duration,
    /// Keep-alive ping interval
    pub ping_interval: Duration,
    /// Maximum number of trades buffered between the reader and the consumer
    pub channel_buffer_size: usize,
}

impl StreamConfig {
    /// Create a new configuration for the provided [`Pair`] on the default Coinbase feed.
    pub fn new(pair: Pair) -> Self {
        Self {
            url: coinbase::BASE_URL_COINBASE.to_string(),
            pair,
            backoff: BackoffPolicy::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            ping_interval: DEFAULT_PING_INTERVAL,
            channel_buffer_size: DEFAULT_CHANNEL_BUFFER_SIZE,
        }
    }

    /// Set feed URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set reconnect backoff policy
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set dial timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set idle read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set ping interval, at least [`MIN_PING_INTERVAL`]
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval.max(MIN_PING_INTERVAL);
        self
    }

    /// Set trade channel buffer size
    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size.max(1);
        self
    }
}

/// Receiving ends of a running [`StreamConnector`].
#[derive(Debug)]
pub struct FeedChannels {
    pub trades: mpsc::Receiver<TradeEvent>,
    pub status: watch::Receiver<ConnectionStatus>,
    pub task: JoinHandle<()>,
}

/// Owns the feed subscription for one [`Pair`].
#[derive(Debug, Clone)]
pub struct StreamConnector {
    config: StreamConfig,
}

/// Why a connection ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    ReceiverDropped,
}

impl StreamConnector {
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }

    /// Spawn the connection task.
    ///
    /// The task runs until `shutdown` becomes `true` (or its sender is dropped), or until the
    /// trade receiver is dropped.
    pub fn start(self, shutdown: watch::Receiver<bool>) -> FeedChannels {
        let (trade_tx, trades) = mpsc::channel(self.config.channel_buffer_size);
        let (status_tx, status) = watch::channel(ConnectionStatus::Connecting);

        let task = tokio::spawn(async move {
            self.run(trade_tx, status_tx, shutdown).await;
        });

        FeedChannels {
            trades,
            status,
            task,
        }
    }

    /// Connection loop: connect, stream, back off, repeat.
    pub async fn run(
        self,
        trade_tx: mpsc::Sender<TradeEvent>,
        status_tx: watch::Sender<ConnectionStatus>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!(url = %self.config.url, pair = %self.config.pair, "starting feed connector");

        let mut backoff = ReconnectBackoff::new(self.config.backoff);

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self
                .session(&trade_tx, &status_tx, &mut backoff, &mut shutdown)
                .await
            {
                Ok(SessionEnd::Shutdown) => {
                    debug!("feed connector received shutdown");
                    break;
                }
                Ok(SessionEnd::ReceiverDropped) => {
                    warn!("trade receiver dropped, stopping feed connector");
                    break;
                }
                Err(error) => {
                    let delay = backoff.record_failure();
                    let _ = status_tx.send(ConnectionStatus::Reconnecting);
                    warn!(
                        %error,
                        failures = backoff.failures(),
                        ?delay,
                        "feed connection failed, reconnecting after backoff"
                    );

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = shutdown.changed() => {
                            debug!("feed connector received shutdown during backoff");
                            break;
                        }
                    }
                }
            }
        }

        let _ = status_tx.send(ConnectionStatus::Disconnected);
        info!("feed connector stopped");
    }

    /// One connection: dial, subscribe, forward trades until something fails.
    async fn session(
        &self,
        trade_tx: &mpsc::Sender<TradeEvent>,
        status_tx: &watch::Sender<ConnectionStatus>,
        backoff: &mut ReconnectBackoff,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<SessionEnd, DataError> {
        let (ws_stream, _) = tokio::time::timeout(
            self.config.connect_timeout,
            connect_async(self.config.url.as_str()),
        )
        .await
        .map_err(|_| DataError::ConnectTimeout {
            timeout_secs: self.config.connect_timeout.as_secs(),
        })?
        .map_err(|error| DataError::Connect(error.to_string()))?;

        let (mut write, read) = ws_stream.split();

        let subscribe = CoinbaseSubscribe::ticker(&self.config.pair).to_json()?;
        write.send(Message::text(subscribe)).await?;

        info!(url = %self.config.url, pair = %self.config.pair, "subscribed to ticker feed");
        let _ = status_tx.send(ConnectionStatus::Connected);

        let mut read = TimeoutStream::new(read, self.config.read_timeout);
        let mut ping = tokio::time::interval_at(
            tokio::time::Instant::now() + self.config.ping_interval,
            self.config.ping_interval,
        );

        loop {
            let message = tokio::select! {
                _ = shutdown.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(SessionEnd::Shutdown);
                }
                _ = ping.tick() => {
                    write.send(Message::Ping(Vec::new().into())).await?;
                    continue;
                }
                message = read.next() => message,
            };

            match message {
                Some(Ok(Message::Text(text))) => match coinbase::parse_message(text.as_str()) {
                    Ok(Some(trade)) => {
                        backoff.record_success();
                        if trade_tx.send(trade).await.is_err() {
                            return Ok(SessionEnd::ReceiverDropped);
                        }
                    }
                    Ok(None) => {
                        debug!(payload = text.as_str(), "discarding handshake message");
                    }
                    Err(DataError::Exchange { message, reason }) => {
                        warn!(%message, %reason, "feed reported an error");
                    }
                    Err(error) if error.is_malformed() => {
                        debug!(%error, "discarding malformed message");
                    }
                    Err(error) => return Err(error),
                },
                Some(Ok(Message::Close(frame))) => {
                    return Err(DataError::StreamEnded(format!(
                        "closed by server: {frame:?}"
                    )));
                }
                Some(Ok(_)) => {
                    // Ping/Pong/Binary - tungstenite answers pings itself
                }
                Some(Err(error)) => return Err(DataError::from(error)),
                None if read.timed_out() => {
                    return Err(DataError::StreamEnded(format!(
                        "no data received for {} seconds",
                        self.config.read_timeout.as_secs()
                    )));
                }
                None => return Err(DataError::StreamEnded("stream terminated".to_string())),
            }
        }
    }
}
