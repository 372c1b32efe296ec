//! # Presentation Contract
//!
//! Outputs produced by the core and consumed by an external renderer.
//!
//! Every derived-state change is funnelled through a single [`ViewSender`]
//! into one receiver. The renderer drains that receiver on its own context,
//! so indicator, message and list updates are applied serially and in the
//! order the core produced them.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use crate::entities::Entry;

/// Tri-state authentication indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorState {
    /// Idle, nothing to authenticate.
    Off,
    /// Waiting for (or ready for another) authentication attempt.
    On,
    /// The last attempt failed.
    Error,
}

/// One-shot signals shown transiently by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// A value was decrypted; carries the UTF-8 text.
    Value(String),
    /// The first event after activation was already `READY`.
    Anomaly(String),
}

/// A single change to the rendered state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewUpdate {
    /// New indicator state.
    Indicator(IndicatorState),
    /// New message text, possibly empty.
    Message(String),
    /// Transient notification.
    Notify(Notification),
    /// Whether the write affordance is enabled.
    WriteEnabled(bool),
    /// Whether key/value inputs and the write affordance accept interaction.
    InputsEnabled(bool),
    /// Key and value inputs were reset; focus should leave the inputs.
    InputsCleared,
    /// Fresh snapshot of the stored entries.
    Entries(Vec<Entry>),
}

/// Sending half of the presentation channel.
#[derive(Debug, Clone)]
pub struct ViewSender {
    tx: mpsc::UnboundedSender<ViewUpdate>,
}

/// Create the presentation channel.
#[must_use]
pub fn view_channel() -> (ViewSender, mpsc::UnboundedReceiver<ViewUpdate>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ViewSender { tx }, rx)
}

impl ViewSender {
    /// Publish an update. Returns `false` when the renderer has gone away.
    pub fn send(&self, update: ViewUpdate) -> bool {
        match self.tx.send(update) {
            Ok(()) => true,
            Err(e) => {
                warn!(update = ?e.0, "Renderer gone, view update dropped");
                false
            }
        }
    }

    /// Publish a new indicator state.
    pub fn indicator(&self, state: IndicatorState) -> bool {
        self.send(ViewUpdate::Indicator(state))
    }

    /// Publish new message text.
    pub fn message(&self, text: impl Into<String>) -> bool {
        self.send(ViewUpdate::Message(text.into()))
    }

    /// Publish a notification.
    pub fn notify(&self, notification: Notification) -> bool {
        self.send(ViewUpdate::Notify(notification))
    }

    /// Whether the receiving renderer has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_arrive_in_order() {
        let (view, mut rx) = view_channel();
        assert!(view.indicator(IndicatorState::On));
        assert!(view.message("hello"));
        assert!(view.notify(Notification::Value("v".into())));

        assert_eq!(rx.try_recv().ok(), Some(ViewUpdate::Indicator(IndicatorState::On)));
        assert_eq!(rx.try_recv().ok(), Some(ViewUpdate::Message("hello".into())));
        assert_eq!(
            rx.try_recv().ok(),
            Some(ViewUpdate::Notify(Notification::Value("v".into())))
        );
    }

    #[test]
    fn test_send_after_renderer_dropped() {
        let (view, rx) = view_channel();
        drop(rx);
        assert!(view.is_closed());
        assert!(!view.message("lost"));
    }
}
