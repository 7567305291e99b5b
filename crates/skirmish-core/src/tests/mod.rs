//! Crate-level scenario and property tests.
//!
//! Unit tests live next to the code they cover; this module drives whole
//! battlefields through many ticks:
//! - **Integration tests**: orders, combat, despawn, usables and pickup end to end
//! - **Property tests**: damage and healing invariants under random inputs
//! - **Helper functions**: battlefield and unit factories
//!
//! # Test Structure
//!
//! - `integration.rs`: scenario tests over a [`Battlefield`](crate::battlefield::Battlefield)
//! - `properties.rs`: `proptest` checks on [`Unit`](crate::unit::Unit)
//! - `helpers.rs`: setup utilities

mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;
