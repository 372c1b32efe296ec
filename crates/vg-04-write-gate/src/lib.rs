//! # VG-04 Write Gate
//!
//! Enables the write affordance only while both inputs hold text, and runs
//! the optimistic write sequence:
//!
//! ```text
//! submit()
//!   ├─ capture (key, value)
//!   ├─ Indicator(Off), Message("")
//!   ├─ reset inputs → InputsCleared, WriteEnabled(false)
//!   └─ spawn write on the worker context (fire and forget)
//! ```
//!
//! The reset is published before the write is even started, so the renderer
//! never waits on the store. Write failures are logged and not surfaced.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::WriteInputs;
pub use error::WriteGateError;
pub use service::WriteGate;
