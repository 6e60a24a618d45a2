//! Declarations of recordable contracts and service contracts
//!
//! Contracts are plain data: without runtime reflection, the set of methods a
//! recording proxy supports is declared up front and every call is checked
//! against it.

use serde::{Deserialize, Serialize};

use crate::binding;
use crate::error::{Error, Result};
use crate::contract::value::Value;

/// Declared type of one contract-method parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Bool,
    Int,
    Float,
    Str,
    /// A reference to a named type, embedded as a constant
    TypeRef,
    /// The runtime context itself is passed through, no value is captured
    Context,
}

impl ParamType {
    /// Name used in error reports
    pub fn describe(&self) -> &'static str {
        match self {
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Str => "str",
            ParamType::TypeRef => "type reference",
            ParamType::Context => "runtime context",
        }
    }
}

/// One declared parameter, optionally bound to a runtime context key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            binding: None,
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Float)
    }

    pub fn str(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Str)
    }

    pub fn type_ref(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::TypeRef)
    }

    pub fn context(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Context)
    }

    /// Bind this parameter to a runtime context key; its value is looked up
    /// at startup instead of being captured at build time
    pub fn bound(mut self, key: impl Into<String>) -> Self {
        self.binding = Some(key.into());
        self
    }
}

/// Declared return shape of a contract method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ReturnType {
    Unit,
    Bool,
    Int,
    Float,
    Str,
    /// Returns another recordable contract, enabling fluent call chains
    Chained(String),
    /// A type the recorder cannot hand back at build time
    Opaque(String),
}

impl ReturnType {
    /// The declared zero value handed to build-time code for primitive
    /// returns of unexecuted recorded calls
    pub fn zero(&self) -> Option<Value> {
        match self {
            ReturnType::Bool => Some(Value::Bool(false)),
            ReturnType::Int => Some(Value::Int(0)),
            ReturnType::Float => Some(Value::Float(0.0)),
            _ => None,
        }
    }
}

/// Declared return slot: shape plus an optional context binding that stores
/// the call result into the runtime context at replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSpec {
    pub ty: ReturnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
}

impl ReturnSpec {
    pub fn unit() -> Self {
        Self {
            ty: ReturnType::Unit,
            binding: None,
        }
    }

    pub fn of(ty: ReturnType) -> Self {
        Self { ty, binding: None }
    }

    /// Fluent chain: the method returns the named recordable contract
    pub fn chained(contract: impl Into<String>) -> Self {
        Self::of(ReturnType::Chained(contract.into()))
    }

    /// Store the call result under a context key at replay
    pub fn bound(mut self, key: impl Into<String>) -> Self {
        self.binding = Some(key.into());
        self
    }
}

impl Default for ReturnSpec {
    fn default() -> Self {
        Self::unit()
    }
}

/// One declared method of a recordable contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<ParamSpec>,
    pub ret: ReturnSpec,
}

impl MethodSig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: ReturnSpec::unit(),
        }
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_return(mut self, ret: ReturnSpec) -> Self {
        self.ret = ret;
        self
    }
}

/// A recordable contract: the declared set of methods a recording proxy
/// supports and a synthesized unit can invoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    name: String,
    methods: Vec<MethodSig>,
}

impl Contract {
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodSig> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Builder for [`Contract`]; `build` checks the declaration so that malformed
/// bindings fail here, at declaration time, never at replay
pub struct ContractBuilder {
    name: String,
    methods: Vec<MethodSig>,
}

impl ContractBuilder {
    pub fn with_method(mut self, method: MethodSig) -> Self {
        self.methods.push(method);
        self
    }

    pub fn build(self) -> Result<Contract> {
        if self.name.is_empty() {
            return Err(Error::Contract("contract name is empty".to_string()));
        }
        for (i, method) in self.methods.iter().enumerate() {
            if self.methods[..i].iter().any(|m| m.name == method.name) {
                return Err(Error::Contract(format!(
                    "duplicate method {} on {}",
                    method.name, self.name
                )));
            }
            for param in &method.params {
                if let Some(key) = &param.binding {
                    binding::validate_key(key)?;
                    if param.ty == ParamType::Context {
                        return Err(Error::Contract(format!(
                            "{}.{} parameter {} is context-typed and cannot carry a binding",
                            self.name, method.name, param.name
                        )));
                    }
                }
            }
            if let Some(key) = &method.ret.binding {
                binding::validate_key(key)?;
                match method.ret.ty {
                    ReturnType::Unit | ReturnType::Chained(_) | ReturnType::Opaque(_) => {
                        return Err(Error::Contract(format!(
                            "{}.{} return produces no storable value but is bound to {key:?}",
                            self.name, method.name
                        )));
                    }
                    _ => {}
                }
            }
            if let ReturnType::Chained(target) = &method.ret.ty {
                if target.is_empty() {
                    return Err(Error::Contract(format!(
                        "{}.{} chains to an unnamed contract",
                        self.name, method.name
                    )));
                }
            }
        }
        Ok(Contract {
            name: self.name,
            methods: self.methods,
        })
    }
}

/// The interface of a synthesized unit: a name plus the ordered methods the
/// unit implements. Each synthesized method takes the runtime context as its
/// sole parameter and returns nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceContract {
    name: String,
    methods: Vec<String>,
}

impl ServiceContract {
    pub fn builder(name: impl Into<String>) -> ServiceContractBuilder {
        ServiceContractBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

/// Builder for [`ServiceContract`]
pub struct ServiceContractBuilder {
    name: String,
    methods: Vec<String>,
}

impl ServiceContractBuilder {
    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    pub fn build(self) -> Result<ServiceContract> {
        if self.name.is_empty() {
            return Err(Error::Contract("service contract name is empty".to_string()));
        }
        if self.methods.is_empty() {
            return Err(Error::Contract(format!(
                "service contract {} declares no methods",
                self.name
            )));
        }
        for (i, method) in self.methods.iter().enumerate() {
            if self.methods[..i].contains(method) {
                return Err(Error::Contract(format!(
                    "duplicate method {} on service contract {}",
                    method, self.name
                )));
            }
        }
        Ok(ServiceContract {
            name: self.name,
            methods: self.methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_contract() -> Contract {
        Contract::builder("Setup")
            .with_method(
                MethodSig::new("configure")
                    .with_param(ParamSpec::str("name"))
                    .with_param(ParamSpec::int("size")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_contract_lookup() {
        let contract = setup_contract();
        assert_eq!(contract.name(), "Setup");
        let sig = contract.method("configure").unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[1].ty, ParamType::Int);
        assert!(contract.method("teardown").is_none());
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let result = Contract::builder("Setup")
            .with_method(MethodSig::new("configure"))
            .with_method(MethodSig::new("configure"))
            .build();
        assert!(matches!(result, Err(Error::Contract(_))));
    }

    #[test]
    fn test_binding_on_context_param_rejected() {
        let result = Contract::builder("Setup")
            .with_method(
                MethodSig::new("configure").with_param(ParamSpec::context("ctx").bound("key")),
            )
            .build();
        assert!(matches!(result, Err(Error::Contract(_))));
    }

    #[test]
    fn test_malformed_binding_key_rejected() {
        let result = Contract::builder("Setup")
            .with_method(
                MethodSig::new("configure").with_param(ParamSpec::int("size").bound("has space")),
            )
            .build();
        assert!(matches!(result, Err(Error::MalformedKey { .. })));
    }

    #[test]
    fn test_bound_return_needs_value() {
        let result = Contract::builder("Pool")
            .with_method(MethodSig::new("start").with_return(ReturnSpec::unit().bound("started")))
            .build();
        assert!(matches!(result, Err(Error::Contract(_))));

        let ok = Contract::builder("Pool")
            .with_method(
                MethodSig::new("size").with_return(ReturnSpec::of(ReturnType::Int).bound("size")),
            )
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_service_contract_build() {
        let service = ServiceContract::builder("StartupHook")
            .with_method("startup")
            .build()
            .unwrap();
        assert_eq!(service.methods(), ["startup"]);

        assert!(ServiceContract::builder("Empty").build().is_err());
        assert!(
            ServiceContract::builder("Hook")
                .with_method("startup")
                .with_method("startup")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_return_zero_values() {
        assert_eq!(ReturnType::Int.zero(), Some(Value::Int(0)));
        assert_eq!(ReturnType::Bool.zero(), Some(Value::Bool(false)));
        assert_eq!(ReturnType::Unit.zero(), None);
        assert_eq!(ReturnType::Chained("Pool".to_string()).zero(), None);
    }
}
