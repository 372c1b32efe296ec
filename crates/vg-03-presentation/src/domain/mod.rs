//! Domain Layer - Pure presentation logic
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod mapping;

pub use config::{ProjectorConfig, DEFAULT_RECOVERY_DELAY};
pub use mapping::{default_message, indicator_for, message_for, texts, ANOMALY_TEXT};
