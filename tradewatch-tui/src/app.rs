//! Foreground event loop: the single owner of the aggregator and the only caller of `draw`.

use crate::{
    aggregator::Aggregator, config::DashboardConfig, error::DashboardError, input, render,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_more::From;
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use tradewatch_data::{ConnectionStatus, FeedChannels, StreamConfig, StreamConnector, TradeEvent};

/// Upper bound on queued trades folded into a single repaint.
pub const MAX_COALESCED_TRADES: usize = 256;

/// How long the connector task gets to wind down after shutdown before it is aborted.
const CONNECTOR_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

const INPUT_CHANNEL_SIZE: usize = 64;

/// Everything the foreground loop reacts to.
#[derive(Debug, Clone, PartialEq, From)]
pub enum AppEvent {
    Trade(TradeEvent),
    Input(Event),
    Status(ConnectionStatus),
}

/// What the loop should do after handling an [`AppEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Redraw,
    Idle,
    Quit,
}

/// Dashboard state: configuration, aggregated history and the latest feed status.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    aggregator: Aggregator,
    status: ConnectionStatus,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let aggregator = Aggregator::new(config.candle_window, config.history_capacity);
        Self {
            config,
            aggregator,
            status: ConnectionStatus::default(),
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn handle(&mut self, event: AppEvent) -> Control {
        match event {
            AppEvent::Trade(trade) => {
                self.aggregator.ingest(trade);
                Control::Redraw
            }
            AppEvent::Status(status) if status != self.status => {
                debug!(?status, "feed status changed");
                self.status = status;
                Control::Redraw
            }
            AppEvent::Status(_) => Control::Idle,
            AppEvent::Input(Event::Key(key)) if is_quit(&key) => Control::Quit,
            AppEvent::Input(Event::Resize(..)) => Control::Redraw,
            AppEvent::Input(_) => Control::Idle,
        }
    }

    /// Ingest trades already waiting in `trades`, at most [`MAX_COALESCED_TRADES`].
    pub fn ingest_pending(&mut self, trades: &mut mpsc::Receiver<TradeEvent>) -> usize {
        let mut ingested = 0;
        while ingested < MAX_COALESCED_TRADES {
            let Ok(trade) = trades.try_recv() else {
                break;
            };
            self.aggregator.ingest(trade);
            ingested += 1;
        }
        ingested
    }

    pub fn draw(&self, frame: &mut Frame) {
        render::draw(frame, &self.config, &self.aggregator, self.status);
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Start the feed and the input reader, then repaint on every trade, resize or status change
/// until a quit key is pressed.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    mut dashboard: Dashboard,
    stream: StreamConfig,
) -> Result<(), DashboardError> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let FeedChannels {
        mut trades,
        mut status,
        mut task,
    } = StreamConnector::new(stream).start(shutdown_rx);

    let (input_tx, mut inputs) = mpsc::channel(INPUT_CHANNEL_SIZE);
    input::spawn(input_tx);

    terminal.draw(|frame| dashboard.draw(frame))?;

    let result = loop {
        let event = tokio::select! {
            Some(trade) = trades.recv() => AppEvent::Trade(trade),
            Some(event) = inputs.recv() => AppEvent::Input(event),
            Ok(()) = status.changed() => AppEvent::Status(*status.borrow_and_update()),
            else => {
                warn!("all dashboard event sources closed");
                break Ok(());
            }
        };

        let coalesce = matches!(event, AppEvent::Trade(_));
        let control = dashboard.handle(event);
        if coalesce {
            dashboard.ingest_pending(&mut trades);
        }

        match control {
            Control::Quit => break Ok(()),
            Control::Redraw => {
                if let Err(error) = terminal.draw(|frame| dashboard.draw(frame)) {
                    break Err(DashboardError::from(error));
                }
            }
            Control::Idle => {}
        }
    };

    info!("dashboard shutting down");
    let _ = shutdown_tx.send(true);
    drop(inputs);
    drop(trades);

    if tokio::time::timeout(CONNECTOR_SHUTDOWN_GRACE, &mut task)
        .await
        .is_err()
    {
        debug!("connector did not stop in time, aborting");
        task.abort();
    }

    result
}
