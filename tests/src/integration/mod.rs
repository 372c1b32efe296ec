//! Integration scenarios.

#[cfg(test)]
pub mod fixtures;
pub mod flows;
pub mod lifecycle;
