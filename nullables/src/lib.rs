//! Nullable infrastructure for deterministic testing.
//!
//! Time and call targets are the two things a governance run depends on
//! from the outside. This crate provides test-friendly versions of both
//! that return deterministic values and can be controlled programmatically.
//!
//! Usage: swap real targets and wall-clock indices for nullables in tests.

pub mod clock;
pub mod target;

pub use clock::NullClock;
pub use target::{NullTarget, ReceivedCall};
