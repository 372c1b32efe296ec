//! # Shared Types Crate
//!
//! This crate contains the value types that cross subsystem boundaries in the
//! read/write pipeline, plus the presentation contract consumed by an external
//! renderer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Errors Are Values**: Authentication progress and failure travel as
//!   `AuthEvent` values with a closed `ReadState`; they are never raised as
//!   Rust errors across the orchestration boundary.
//! - **Structural Invariants**: An `AuthEvent` carries a decrypted value if and
//!   only if its state is `Ready`. The constructors are the only way to build
//!   one, so the invariant cannot be broken by callers.
//!
//! ## Flow
//!
//! ```text
//!  StorageKey ──submit──→ [vg-02 Multiplexer] ──AuthEvent──→ [shared-bus Hub]
//!                                                                 │
//!                           ┌─────────────────────────────────────┤
//!                           ↓                                     ↓
//!                 [vg-03 Projector]                     [notification listeners]
//!                           │                                     │
//!                           └───────────ViewUpdate────────────────┘
//!                                           │
//!                                           ↓
//!                                   external renderer
//! ```

pub mod entities;
pub mod errors;
pub mod presentation;

pub use entities::*;
pub use errors::*;
pub use presentation::*;
