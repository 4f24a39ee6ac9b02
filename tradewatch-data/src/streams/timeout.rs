//! Idle timeout wrapper for feed streams.
//!
//! Ends the wrapped stream if nothing is received for a configurable period. Silent
//! disconnects never produce a socket error, so without this a dead feed would look like a
//! quiet market forever.

use futures::Stream;
use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use tokio::time::Instant;

/// Default read timeout for the feed (2 minutes).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(120);

/// A stream wrapper that terminates the stream if no item arrives within `timeout`.
#[derive(Debug)]
pub struct TimeoutStream<S> {
    inner: S,
    timeout: Duration,
    deadline: Pin<Box<tokio::time::Sleep>>,
    timed_out: bool,
}

impl<S> TimeoutStream<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            deadline: Box::pin(tokio::time::sleep(timeout)),
            timed_out: false,
        }
    }

    /// True once the stream has ended because the timeout elapsed.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl<S> Stream for TimeoutStream<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.timed_out {
            return Poll::Ready(None);
        }

        let timeout = self.timeout;

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                self.deadline.as_mut().reset(Instant::now() + timeout);
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => match self.deadline.as_mut().poll(cx) {
                Poll::Ready(()) => {
                    tracing::warn!(
                        timeout_secs = timeout.as_secs(),
                        "feed read timeout - no data received, ending stream"
                    );
                    self.timed_out = true;
                    Poll::Ready(None)
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
