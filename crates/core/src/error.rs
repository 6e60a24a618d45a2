use std::io;

/// Errors raised while recording or emitting, at build time.
///
/// All of these abort the current build step. None are retried and none are
/// deferred to the startup phase.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unrecordable argument: {contract}.{method} parameter {index} cannot be captured as {declared}")]
    UnrecordableArgument {
        contract: String,
        method: String,
        index: usize,
        declared: String,
    },

    #[error("Ambiguous method selection: service {service} declares {count} methods, select one by name")]
    AmbiguousMethod { service: String, count: usize },

    #[error("Unknown method {method} on {contract}")]
    UnknownMethod { contract: String, method: String },

    #[error("Arity mismatch: {contract}.{method} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        contract: String,
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed context key: {key:?}")]
    MalformedKey { key: String },

    #[error("Stale session use: unit {unit} is already closed")]
    StaleSession { unit: String },

    #[error("Contract declaration error: {0}")]
    Contract(String),

    #[error("Internal consistency error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for build-time recording operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while a synthesized unit executes at startup.
///
/// This is a separate surface from [`Error`]: replay failures are startup
/// failures of the generated unit, not recording concerns.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Missing context key {key:?}")]
    MissingKey { key: String },

    #[error("No factory registered for contract {contract}")]
    UnknownContract { contract: String },

    #[error("Unknown method {method} on replay target {contract}")]
    UnknownMethod { contract: String, method: String },

    #[error("Result of {contract}.{method} is bound to {key:?} but the call produced no value")]
    MissingResult {
        contract: String,
        method: String,
        key: String,
    },

    #[error("Malformed replay program: {0}")]
    Malformed(String),

    #[error("Replay target failure: {0}")]
    Target(String),
}

/// Result type alias for startup-time replay operations
pub type ReplayResult<T> = std::result::Result<T, ReplayError>;
