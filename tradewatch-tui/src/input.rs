use crossterm::event::{self, Event};
use std::{thread, time::Duration};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How long the reader blocks waiting for terminal input before re-checking its channel.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn a blocking thread forwarding key and resize events into `tx`.
///
/// The thread exits once the receiving side of `tx` is dropped or the terminal errors.
pub fn spawn(tx: mpsc::Sender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "terminal input poll failed");
                    break;
                }
            }

            let event = match event::read() {
                Ok(event) => event,
                Err(error) => {
                    warn!(%error, "terminal input read failed");
                    break;
                }
            };

            if tx.blocking_send(event).is_err() {
                break;
            }
        }
        debug!("input reader stopped");
    })
}
