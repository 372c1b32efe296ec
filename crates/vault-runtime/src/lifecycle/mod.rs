//! # Lifecycle Manager
//!
//! ```text
//!               enter_foreground()
//!  ┌────────────┐  capable   ┌───────────────────────┐
//!  │ Background │ ─────────→ │ Foreground / Active   │  pipeline running
//!  │ (initial)  │ ←───────── │                       │
//!  └────────────┘  enter_    └───────────────────────┘
//!        │  ↑      background()
//!        │  │                ┌───────────────────────┐
//!        │  └─────────────── │ Foreground / Disabled │  no pipeline built
//!        └─────────────────→ └───────────────────────┘
//!          not capable
//! ```
//!
//! Every foreground entry builds a fresh session; nothing but the two
//! external stores survives a background transition.

pub mod controller;
pub mod error;
pub mod session;

pub use controller::{LifecyclePhase, VaultController, UNAVAILABLE_MESSAGE};
pub use error::SessionError;
pub use session::ForegroundSession;
