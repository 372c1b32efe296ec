//! # VG-01 Secure Storage
//!
//! Boundary to the two external collaborators of the pipeline.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Ports Layer** (`ports/`): Trait definitions (driven ports)
//!   - `SecureStore`: capability check, write, read-as-event-stream
//!   - `EntryStore`: live sequence of stored `(key, payload)` snapshots
//!
//! - **Adapters Layer** (`adapters/`): In-memory implementations
//!   - `MemorySecureStore`: values in a map, authentication driven by a
//!     simulated sensor
//!   - `MemoryEntryStore`: watch-backed snapshot list
//!
//! The in-memory adapters perform no encryption and exist for tests and the
//! demo runtime. Real platform adapters (hardware keystore plus biometric
//! prompt) implement the same ports.
//!
//! ## Read Contract
//!
//! ```text
//! read(key) ──→ NEEDS_AUTH ──→ (AUTHORIZATION_ERROR | RECOVERABLE_ERROR)* ──→ READY
//!                                                                        └──→ UNRECOVERABLE_ERROR
//! ```
//!
//! Dropping the returned stream cancels the read.

pub mod adapters;
pub mod error;
pub mod ports;

pub use adapters::{MemoryEntryStore, MemorySecureStore, SensorOutcome};
pub use error::StoreError;
pub use ports::{AuthEventStream, EntryStore, EntryStream, SecureStore};
