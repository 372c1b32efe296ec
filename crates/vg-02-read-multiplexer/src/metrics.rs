//! Counters for the read switch.

use std::sync::atomic::{AtomicU64, Ordering};

/// Switch counters shared between the switch and its requesters.
#[derive(Debug, Default)]
pub struct SwitchMetrics {
    /// Reads started against the secure store
    pub reads_started: AtomicU64,
    /// Reads cancelled by a newer submission
    pub reads_cancelled: AtomicU64,
    /// Reads whose event sequence ended on its own
    pub reads_completed: AtomicU64,
    /// Events handed to the hub
    pub events_forwarded: AtomicU64,
    /// Queued submissions skipped in favour of a later one
    pub requests_superseded: AtomicU64,
}

impl SwitchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_read_started(&self) {
        self.reads_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_cancelled(&self) {
        self.reads_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_completed(&self) {
        self.reads_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_forwarded(&self) {
        self.events_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_superseded(&self, count: u64) {
        self.requests_superseded.fetch_add(count, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> SwitchMetricsSnapshot {
        SwitchMetricsSnapshot {
            reads_started: self.reads_started.load(Ordering::Relaxed),
            reads_cancelled: self.reads_cancelled.load(Ordering::Relaxed),
            reads_completed: self.reads_completed.load(Ordering::Relaxed),
            events_forwarded: self.events_forwarded.load(Ordering::Relaxed),
            requests_superseded: self.requests_superseded.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time switch counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwitchMetricsSnapshot {
    pub reads_started: u64,
    pub reads_cancelled: u64,
    pub reads_completed: u64,
    pub events_forwarded: u64,
    pub requests_superseded: u64,
}

impl SwitchMetricsSnapshot {
    /// Reads started but neither cancelled nor completed. Never more than one.
    pub fn reads_in_flight(&self) -> u64 {
        self.reads_started
            .saturating_sub(self.reads_cancelled)
            .saturating_sub(self.reads_completed)
    }
}
