//! # Vault Runtime Library
//!
//! Lifecycle manager and pipeline wiring for the secure key/value client.
//! The `vault-runtime` binary drives it against in-memory collaborators.
//!
//! ## Modules
//!
//! - `container/` - Runtime configuration
//! - `lifecycle/` - Foreground/background controller and session handles
//! - `wiring/` - Assembly of a session's pipeline

pub mod container;
pub mod lifecycle;
pub mod wiring;

pub use container::{ConfigError, RuntimeConfig, SeedEntry};
pub use lifecycle::{
    ForegroundSession, LifecyclePhase, SessionError, VaultController, UNAVAILABLE_MESSAGE,
};
