//! Thin facade over `playback-core` for integration tests and demos.
//!
//! The engine itself lives in `crates/core`.

pub use playback_core::*;
