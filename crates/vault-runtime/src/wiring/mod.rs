//! # Pipeline Wiring
//!
//! Assembles a foreground session from the subsystem crates.

pub mod pipeline;

pub use pipeline::{build_session, forward_entries};
