//! # VG-03 Presentation State Projector
//!
//! Derives what the renderer shows from the multicast read events.
//!
//! ## Outputs
//!
//! ```text
//!                      ┌──────────────────┐  Indicator, Message
//!    hub ──────────→   │  StateProjector  │ ───────────────────────→ ┐
//!     │                │  + RecoveryTimer │  Indicator(On) @ +1300ms  │
//!     │                └──────────────────┘ ───────────────────────→ │
//!     │                ┌──────────────────┐                           │
//!     ├────────────→   │ anomaly listener │  first event READY ─────→ ├──→ ViewSender
//!     │                └──────────────────┘  (then detaches)          │
//!     │                ┌──────────────────┐                           │
//!     └────────────→   │  value listener  │  later READY values ────→ ┘
//!                      └──────────────────┘
//! ```
//!
//! ## Layers
//!
//! - `domain/`: pure mappings (state → indicator, event → message), default
//!   texts and `ProjectorConfig`.
//! - `service/`: the async tasks and the `RecoveryTimer`.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{
    indicator_for, message_for, ProjectorConfig, ANOMALY_TEXT, DEFAULT_RECOVERY_DELAY,
};
pub use error::PresentationError;
pub use service::{run_anomaly_listener, run_value_listener, RecoveryTimer, StateProjector};

/// Listener names used when attaching to the hub.
pub mod listeners {
    pub const PROJECTOR: &str = "projector";
    pub const ANOMALY: &str = "anomaly";
    pub const VALUES: &str = "values";
}
