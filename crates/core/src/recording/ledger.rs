//! Ordered ledgers of captured calls

use crate::contract::Value;

/// One captured argument, already validated
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A constant embeddable directly into the synthesized unit
    Literal(Value),
    /// Resolved from the runtime context by key when the unit executes
    ContextLookup(String),
    /// The runtime context itself, passed through unchanged
    ContextHandle,
}

/// One recorded invocation. Immutable once appended to a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCall {
    contract: String,
    method: String,
    args: Vec<Argument>,
}

impl StoredCall {
    pub(crate) fn new(contract: impl Into<String>, method: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            contract: contract.into(),
            method: method.into(),
            args,
        }
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }
}

/// Per-method recording state: the append-only call sequence plus the
/// first-seen order of recordable contracts proxied against this method.
///
/// Call order is the single source of truth for replay order. Recorded calls
/// may have externally observable side effects at startup (registration
/// order, for one), so the sequence is never reordered.
#[derive(Debug)]
pub struct MethodLedger {
    method: String,
    calls: Vec<StoredCall>,
    recordables: Vec<String>,
}

impl MethodLedger {
    pub(crate) fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            calls: Vec::new(),
            recordables: Vec::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn calls(&self) -> &[StoredCall] {
        &self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub(crate) fn append(&mut self, call: StoredCall) {
        self.calls.push(call);
    }

    /// Record that a contract has a proxy on this ledger. Returns true the
    /// first time a contract is seen.
    pub(crate) fn note_recordable(&mut self, contract: &str) -> bool {
        if self.recordables.iter().any(|c| c == contract) {
            false
        } else {
            self.recordables.push(contract.to_string());
            true
        }
    }
}
