//! # Event Source
//!
//! The upstream side of the hub. The hub pulls from its source only after
//! `connect()`, which is what defers activation until listeners are attached.

use async_trait::async_trait;
use shared_types::ReadOutcome;
use tokio::sync::mpsc;

/// Upstream producer polled by the hub once connected.
#[async_trait]
pub trait EventSource: Send + 'static {
    /// Wait for the next event. `None` ends the upstream sequence.
    async fn next_event(&mut self) -> Option<ReadOutcome>;
}

#[async_trait]
impl EventSource for mpsc::Receiver<ReadOutcome> {
    async fn next_event(&mut self) -> Option<ReadOutcome> {
        self.recv().await
    }
}
