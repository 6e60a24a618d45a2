//! The synthesized unit: a straight-line replay instruction list
//!
//! A unit is the directly executable artifact this subsystem produces. It
//! carries no build-time types and needs no resolution at startup: every
//! operand is either an embedded constant or a keyed context lookup.

use serde::{Deserialize, Serialize};

use crate::contract::Value;
use crate::error::Result;

/// One operand of a replayed invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    /// Embedded constant
    Literal(Value),
    /// Looked up from the runtime context by key when the unit executes
    ContextLookup(String),
    /// The runtime context itself
    Context,
}

/// One straight-line replay instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayOp {
    /// Construct a fresh target instance for a contract into a slot
    Construct { slot: usize, contract: String },
    /// Invoke a method on the instance in `slot`; `bind` stores the call
    /// result into the runtime context under that key
    Invoke {
        slot: usize,
        method: String,
        args: Vec<Operand>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bind: Option<String>,
    },
}

/// One synthesized method body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayMethod {
    pub name: String,
    pub ops: Vec<ReplayOp>,
}

/// A complete synthesized unit: one method body per service-contract method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayUnit {
    pub name: String,
    pub service: String,
    pub methods: Vec<ReplayMethod>,
}

impl ReplayUnit {
    /// The persisted form handed to a sink
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<ReplayUnit> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Readable Rust-like source for inspection; the persisted artifact is
    /// the instruction list, not this rendering
    pub fn render_source(&self) -> String {
        super::source::render(self)
    }
}
