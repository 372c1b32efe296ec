//! # Vaultgate Test Suite
//!
//! Cross-crate scenarios driven through the `VaultController` against the
//! in-memory collaborators.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs    # Controller harness and view helpers
//!     ├── lifecycle.rs   # Foreground/background teardown and rebuild
//!     └── flows.rs       # End-to-end read, recovery and write flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vg-tests
//! cargo test -p vg-tests integration::lifecycle::
//! ```

pub mod integration;
