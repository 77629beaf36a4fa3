//! Test utilities for the referrals crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

pub mod app;
pub mod clock;
pub mod fixtures;

pub use app::{TEST_SECRET, memory_state};
pub use clock::MutableClock;
