//! Domain Layer - write inputs
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod inputs;

pub use inputs::WriteInputs;
