//! Adapters Layer
//!
//! In-memory implementations of the driven ports.
//!
//! - `MemoryEntryStore`: watch-backed list of stored entries
//! - `MemorySecureStore`: map-backed secure store with a simulated sensor

pub mod memory_entries;
pub mod memory_store;

pub use memory_entries::MemoryEntryStore;
pub use memory_store::{MemorySecureStore, SensorOutcome};
