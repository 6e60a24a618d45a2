//! Replay targets: the real objects recorded calls execute against

use std::collections::HashMap;
use std::fmt;

use crate::contract::Value;
use crate::error::{ReplayError, ReplayResult};

use super::context::RuntimeContext;

/// A fully resolved invocation argument
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayArg {
    Value(Value),
    /// The runtime context was passed through for this position
    Context,
}

impl ReplayArg {
    pub fn value(&self) -> Option<&Value> {
        match self {
            ReplayArg::Value(value) => Some(value),
            ReplayArg::Context => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    pub fn as_int(&self) -> Option<i64> {
        self.value().and_then(Value::as_int)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }
}

/// Dispatch table for one runtime target type.
///
/// Implementations route each method name to the real operation; unknown
/// names return [`ReplayError::UnknownMethod`]. This is the startup-side
/// mirror of a recordable contract, with no reflection involved.
pub trait ReplayTarget {
    fn invoke(
        &mut self,
        method: &str,
        args: &[ReplayArg],
        ctx: &mut RuntimeContext,
    ) -> ReplayResult<Option<Value>>;
}

impl fmt::Debug for dyn ReplayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReplayTarget")
    }
}

type Factory = Box<dyn Fn() -> Box<dyn ReplayTarget>>;

/// Maps contract names to constructors of real target instances
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Factory>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, contract: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ReplayTarget> + 'static,
    {
        self.factories.insert(contract.into(), Box::new(factory));
    }

    pub fn construct(&self, contract: &str) -> ReplayResult<Box<dyn ReplayTarget>> {
        match self.factories.get(contract) {
            Some(factory) => Ok(factory()),
            None => Err(ReplayError::UnknownContract {
                contract: contract.to_string(),
            }),
        }
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FactoryRegistry")
            .field("contracts", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl ReplayTarget for Noop {
        fn invoke(
            &mut self,
            method: &str,
            _args: &[ReplayArg],
            _ctx: &mut RuntimeContext,
        ) -> ReplayResult<Option<Value>> {
            Err(ReplayError::UnknownMethod {
                contract: "Noop".to_string(),
                method: method.to_string(),
            })
        }
    }

    #[test]
    fn test_registry_construct() {
        let mut registry = FactoryRegistry::new();
        registry.register("Noop", || Box::new(Noop));

        assert!(registry.construct("Noop").is_ok());
        let err = registry.construct("Ghost").unwrap_err();
        assert!(matches!(err, ReplayError::UnknownContract { .. }));
    }

    #[test]
    fn test_replay_arg_accessors() {
        let arg = ReplayArg::Value(Value::Int(16));
        assert_eq!(arg.as_int(), Some(16));
        assert_eq!(arg.as_str(), None);
        assert_eq!(ReplayArg::Context.value(), None);
    }
}
