//! Ports Layer
//!
//! Driven ports: the dependencies the pipeline consumes from the platform.

pub mod outbound;

pub use outbound::{AuthEventStream, EntryStore, EntryStream, SecureStore};
