//! Runtime key/value context supplied to replay units at startup

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::contract::Value;

/// String-keyed value store owned by the startup sequence.
///
/// Replay units resolve context-bound operands against it and store bound
/// call results back into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeContext {
    values: HashMap<String, Value>,
}

impl RuntimeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for startup wiring and tests
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(key, value);
        self
    }

    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let mut ctx = RuntimeContext::new().with("pool-size", 16);
        assert_eq!(ctx.lookup("pool-size"), Some(&Value::Int(16)));
        assert!(ctx.lookup("missing").is_none());

        ctx.bind("db.url", "postgres://localhost");
        assert!(ctx.contains("db.url"));
        assert_eq!(ctx.len(), 2);
    }
}
