//! playback - build-time recording with startup-time replay
//!
//! This crate provides functionality to:
//! - Record configuration calls issued against declared contracts, through
//!   recording proxies that capture instead of execute
//! - Validate every captured argument so recorded calls stay reproducible
//! - Emit each recording session as a freestanding, straight-line replay unit
//! - Execute replay units at startup against a runtime-supplied context
//!
//! There are limits on what can be recorded. Only the following shapes are
//! accepted as proxy-call arguments:
//! - booleans, integers and floats
//! - strings
//! - type references
//! - parameters declared with a context binding (resolved at startup)
//! - the runtime context itself, for parameters declared with that type
//!
//! Anything else fails at the offending call site, at build time, so that an
//! unreproducible configuration never reaches the startup path.

pub mod binding;
pub mod contract;
pub mod emit;
pub mod error;
pub mod naming;
pub mod recording;
pub mod replay;
pub mod sink;

// Re-export commonly used types and traits
pub use error::{Error, ReplayError, ReplayResult, Result};

pub use contract::{
    ArgValue, Contract, MethodSig, ParamSpec, ParamType, ReturnSpec, ReturnType, ServiceContract,
    Value,
};
pub use emit::{Operand, ReplayMethod, ReplayOp, ReplayUnit, emit_unit};
pub use naming::NameAllocator;
pub use recording::{CallOutcome, MethodLedgerRef, Recorder, RecordingProxy};
pub use replay::{FactoryRegistry, ReplayArg, ReplayTarget, RuntimeContext, replay_unit};
pub use sink::{DirSink, MemorySink, Sink};
