//! One-shot notification listeners.
//!
//! Both attach to the hub before activation. They differ only in which
//! `READY` events they claim: the anomaly listener inspects exactly the first
//! event and detaches, the value listener ignores the first event and
//! reports every later `READY`.

use futures::{future, StreamExt};
use shared_bus::Subscription;
use shared_types::{Notification, ReadState, ViewSender};
use tracing::{debug, info};

use crate::domain::ANOMALY_TEXT;

/// Report a first-after-activation `READY` as an anomaly, then detach.
pub async fn run_anomaly_listener(subscription: Subscription, view: ViewSender) {
    let mut events = subscription.into_stream();

    if let Some(first) = events.next().await {
        if first.event.state() == ReadState::Ready {
            info!(op = %first.operation, key = %first.key, "[vg-03] First event already READY");
            view.notify(Notification::Anomaly(ANOMALY_TEXT.to_string()));
        }
    }
    debug!("[vg-03] Anomaly listener detached");
}

/// Report the decrypted text of every `READY` after the first event.
pub async fn run_value_listener(subscription: Subscription, view: ViewSender) {
    let values = subscription
        .into_stream()
        .skip(1)
        .filter(|outcome| future::ready(outcome.event.state() == ReadState::Ready));
    futures::pin_mut!(values);

    while let Some(outcome) = values.next().await {
        let text = outcome
            .event
            .value()
            .map(|payload| payload.to_text_lossy())
            .unwrap_or_default();
        debug!(op = %outcome.operation, key = %outcome.key, "[vg-03] Value decrypted");
        view.notify(Notification::Value(text));
    }
}
