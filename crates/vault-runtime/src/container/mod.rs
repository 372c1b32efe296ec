//! # Runtime Container
//!
//! Configuration shared by every foreground session.

pub mod config;

pub use config::{ConfigError, RuntimeConfig, SeedEntry};
