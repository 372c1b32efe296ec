//! # Listener Subscriptions
//!
//! The receiving side of the hub. A subscription is detached when dropped.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use shared_types::ReadOutcome;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

/// Attached listener counts, keyed by listener name.
pub(crate) type ListenerRegistry = Arc<RwLock<HashMap<&'static str, usize>>>;

/// Keeps the listener registry in sync with live subscriptions.
struct ListenerGuard {
    listener: &'static str,
    listeners: ListenerRegistry,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Ok(mut listeners) = self.listeners.write() else {
            return;
        };
        if let Some(count) = listeners.get_mut(self.listener) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                listeners.remove(self.listener);
            }
        }
        debug!(listener = self.listener, "Listener detached");
    }
}

/// A listener handle for receiving hub events.
///
/// When dropped, the listener is automatically detached.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<ReadOutcome>,

    /// Registry bookkeeping for this listener.
    guard: ListenerGuard,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<ReadOutcome>,
        listener: &'static str,
        listeners: ListenerRegistry,
    ) -> Self {
        Self {
            receiver,
            guard: ListenerGuard {
                listener,
                listeners,
            },
        }
    }

    /// Receive the next event.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next event
    /// - `None` - The hub and its upstream are gone
    pub async fn recv(&mut self) -> Option<ReadOutcome> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(
                        listener = self.guard.listener,
                        lagged = count,
                        "Listener lagged, some events dropped"
                    );
                }
            }
        }
    }

    /// Name this listener was attached under.
    #[must_use]
    pub fn listener(&self) -> &'static str {
        self.guard.listener
    }

    /// Convert into a `Stream` for use with stream combinators.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            guard: self.guard,
        }
    }
}

/// A stream wrapper for subscriptions.
///
/// Lag notifications are logged and skipped; the stream yields events only.
pub struct EventStream {
    inner: BroadcastStream<ReadOutcome>,
    guard: ListenerGuard,
}

impl EventStream {
    /// Name this listener was attached under.
    #[must_use]
    pub fn listener(&self) -> &'static str {
        self.guard.listener
    }
}

impl Stream for EventStream {
    type Item = ReadOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    warn!(
                        listener = self.guard.listener,
                        lagged = count,
                        "Listener lagged, some events dropped"
                    );
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
