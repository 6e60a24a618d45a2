//! Startup-side execution of synthesized replay units
//!
//! This is the minimal runtime half: a key/value context, a dispatch-table
//! trait for real target types, and a straight-line executor. No build-time
//! types, no resolution, no suspension points.

pub mod context;
pub mod executor;
pub mod target;

// Re-export commonly used types
pub use context::RuntimeContext;
pub use executor::{replay_method, replay_unit};
pub use target::{FactoryRegistry, ReplayArg, ReplayTarget};
