//! Code emission: recorded ledgers to freestanding replay units

pub mod emitter;
pub mod program;
pub mod source;

// Re-export commonly used types
pub use emitter::emit_unit;
pub use program::{Operand, ReplayMethod, ReplayOp, ReplayUnit};
