//! # Shared Bus - Multicast Hub for Read Events
//!
//! Shares one upstream sequence of [`ReadOutcome`]s among several independent
//! listeners without re-issuing the underlying read per listener.
//!
//! ## Two-Phase Construction
//!
//! ```text
//!   1. MulticastHub::new(source)      upstream is NOT polled yet
//!   2. hub.subscribe("projector")     ┐
//!      hub.subscribe("anomaly")       ├ attach every listener
//!      hub.subscribe("values")        ┘
//!   3. hub.connect()                  upstream starts; events fan out
//! ```
//!
//! ```text
//! ┌──────────────┐   next_event()   ┌──────────────┐   broadcast   ┌────────────┐
//! │ EventSource  │ ───────────────→ │ MulticastHub │ ────────────→ │ listener A │
//! │ (upstream)   │                  │   (pump)     │ ──────┐       └────────────┘
//! └──────────────┘                  └──────────────┘       │       ┌────────────┐
//!                                                          └─────→ │ listener B │
//!                                                                  └────────────┘
//! ```
//!
//! ## Delivery Rules
//!
//! - Every listener attached before `connect()` observes every event.
//! - Listeners attached after `connect()` observe only subsequent events;
//!   there is no replay buffer.
//! - Dropping a listener detaches it without affecting the others.
//! - Within the upstream sequence, events reach every listener in emission order.
//!
//! [`ReadOutcome`]: shared_types::ReadOutcome

pub mod hub;
pub mod source;
pub mod subscriber;

// Re-export main types
pub use hub::{Connection, HubError, MulticastHub};
pub use source::EventSource;
pub use subscriber::{EventStream, Subscription};

/// Maximum events buffered per listener before the slowest one lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
