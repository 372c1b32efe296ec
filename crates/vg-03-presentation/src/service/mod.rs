//! Service Layer - presentation tasks
//!
//! Each function here is one task of a foreground session; it runs until its
//! hub subscription ends or the session aborts it.

pub mod listeners;
pub mod projector;
pub mod timer;

pub use listeners::{run_anomaly_listener, run_value_listener};
pub use projector::StateProjector;
pub use timer::RecoveryTimer;
