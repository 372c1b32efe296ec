//! # VG-02 Read Multiplexer
//!
//! Turns a sequence of read submissions into one continuous sequence of
//! authentication events, keeping at most one read active.
//!
//! ## Latest Submission Wins
//!
//! ```text
//!  submit("a")          submit("b")
//!      │                    │
//!      ▼                    ▼
//!  ┌────────┐  cancel  ┌────────┐
//!  │ op-1 a │ ───────→ │ op-2 b │ ──→ NEEDS_AUTH, ..., READY
//!  └────────┘          └────────┘
//!      │
//!      └──→ NEEDS_AUTH (never anything after op-2 starts)
//! ```
//!
//! Cancellation is the switch dropping the active operation's event stream,
//! which happens in the same task that forwards events. No event of a
//! cancelled operation can be forwarded after the switch point.
//!
//! Resubmitting the active key is not deduplicated: it cancels and restarts.
//! Keys submitted faster than the switch picks them up collapse into the
//! newest one; the skipped keys are counted as superseded.
//!
//! ## Handles
//!
//! - [`ReadRequester`]: cheap, cloneable submission handle for callers.
//! - [`ReadSwitch`]: the consuming side, an [`shared_bus::EventSource`]
//!   polled by the multicast hub once connected.

pub mod error;
pub mod metrics;
pub mod operation;
pub mod service;

pub use error::MultiplexerError;
pub use metrics::{SwitchMetrics, SwitchMetricsSnapshot};
pub use operation::{OperationSequence, ReadOperation};
pub use service::{ReadMultiplexer, ReadRequester, ReadSwitch};
