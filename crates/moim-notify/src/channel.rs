//! Long-lived server-to-client push channel.
//!
//! A [`PushChannel`] is the sending half of one open subscription; the
//! paired [`ChannelStream`] is handed to the transport layer, which streams
//! its events to the client for as long as the channel is open.
//!
//! Lifecycle: `Open → {Completed, TimedOut, Errored}`, all terminal. The
//! terminal hook supplied at creation time fires exactly once, whichever
//! path closes the channel first; the registry uses it to drop its entry.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use uuid::Uuid;

/// Default channel lifetime: 10 minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Bounded send queue per channel. A subscriber that stops draining its
/// stream errors the channel instead of growing memory without bound.
const CHANNEL_BUFFER: usize = 32;

/// Why a channel reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Client or server ended the stream cleanly.
    Completed,
    /// The channel's lifetime elapsed.
    TimedOut,
    /// A send failed; the channel is poisoned.
    Errored,
}

/// Error returned by [`PushChannel::send`]. Any send error is terminal for
/// the channel; the caller must not retry on the same channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("channel send queue full")]
    Full,
    #[error("event serialization failed: {0}")]
    Serialization(String),
}

/// One discrete event on the wire: an opaque id, an event name, and a JSON
/// payload. Transport-agnostic; the HTTP layer maps this onto SSE frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub id: String,
    pub name: String,
    pub data: String,
}

/// State shared between the sending half and the stream half.
struct Shared {
    id: Uuid,
    terminated: AtomicBool,
    on_terminal: Box<dyn Fn(Uuid, CloseReason) + Send + Sync>,
}

impl Shared {
    /// Transition to a terminal state. The hook fires at most once; later
    /// calls from other paths are no-ops.
    fn fire(&self, reason: CloseReason) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            (self.on_terminal)(self.id, reason);
        }
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}

/// Sending half of one open push connection for a single subscriber.
#[derive(Clone)]
pub struct PushChannel {
    tx: mpsc::Sender<PushEvent>,
    shared: Arc<Shared>,
}

impl PushChannel {
    /// Open a channel with a bounded lifetime.
    ///
    /// `on_terminal` receives this channel's identity and the close reason,
    /// and fires exactly once across completion, timeout, and error.
    pub fn open<F>(timeout: Duration, on_terminal: F) -> (PushChannel, ChannelStream)
    where
        F: Fn(Uuid, CloseReason) + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            terminated: AtomicBool::new(false),
            on_terminal: Box::new(on_terminal),
        });
        let stream = ChannelStream {
            rx,
            deadline: Box::pin(tokio::time::sleep(timeout)),
            shared: Arc::clone(&shared),
        };
        (PushChannel { tx, shared }, stream)
    }

    /// Identity of this channel, distinct across every subscription.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Whether this channel has reached a terminal state.
    pub fn is_terminated(&self) -> bool {
        self.shared.is_terminated()
    }

    /// Deliver one event. Non-blocking; events are yielded to the subscriber
    /// in send order. On any failure the channel transitions to the Errored
    /// terminal state and cannot be reused.
    pub fn send<T: Serialize>(
        &self,
        event_id: &str,
        event_name: &str,
        payload: &T,
    ) -> Result<(), ChannelError> {
        if self.shared.is_terminated() {
            return Err(ChannelError::Closed);
        }

        let data = match serde_json::to_string(payload) {
            Ok(data) => data,
            Err(e) => {
                self.shared.fire(CloseReason::Errored);
                return Err(ChannelError::Serialization(e.to_string()));
            }
        };

        let event = PushEvent {
            id: event_id.to_string(),
            name: event_name.to_string(),
            data,
        };
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.shared.fire(CloseReason::Errored);
                Err(ChannelError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.shared.fire(CloseReason::Errored);
                Err(ChannelError::Closed)
            }
        }
    }
}

/// Receiving half: a finite stream of [`PushEvent`]s owned by the transport
/// layer. Ends when the channel completes, times out, or errors; dropping it
/// (client disconnect) counts as completion.
pub struct ChannelStream {
    rx: mpsc::Receiver<PushEvent>,
    deadline: Pin<Box<Sleep>>,
    shared: Arc<Shared>,
}

impl ChannelStream {
    /// Identity of the channel this stream belongs to.
    pub fn channel_id(&self) -> Uuid {
        self.shared.id
    }
}

impl futures::Stream for ChannelStream {
    type Item = PushEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<PushEvent>> {
        let this = self.as_mut().get_mut();

        // Sender-side poisoning ends the stream without draining the queue.
        if this.shared.is_terminated() {
            return Poll::Ready(None);
        }

        if this.deadline.as_mut().poll(cx).is_ready() {
            this.shared.fire(CloseReason::TimedOut);
            return Poll::Ready(None);
        }

        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => Poll::Ready(Some(event)),
            Poll::Ready(None) => {
                this.shared.fire(CloseReason::Completed);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ChannelStream {
    fn drop(&mut self) {
        self.shared.fire(CloseReason::Completed);
    }
}
