//! Declared contract metadata and the literal value domain

pub mod decl;
pub mod value;

// Re-export commonly used types
pub use decl::{
    Contract, ContractBuilder, MethodSig, ParamSpec, ParamType, ReturnSpec, ReturnType,
    ServiceContract, ServiceContractBuilder,
};
pub use value::{ArgValue, Value};
