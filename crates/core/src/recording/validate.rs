//! Per-argument validation, applied the moment a call is issued
//!
//! The narrow allow-list is what keeps every recorded call reproducible as
//! freestanding code: arbitrary object graphs cannot be captured because
//! there is no way to reconstruct them without build-time types. Failures
//! surface immediately at the offending call site, never at emission time.

use crate::binding;
use crate::contract::{ArgValue, ParamSpec, ParamType, Value};
use crate::error::Error;

use super::ledger::Argument;

/// A rejected argument. Kept apart from [`Error`] so the session can remember
/// why it aborted and report the same failure again on close.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub contract: String,
    pub method: String,
    pub index: usize,
    pub declared: String,
}

impl From<Rejection> for Error {
    fn from(r: Rejection) -> Self {
        Error::UnrecordableArgument {
            contract: r.contract,
            method: r.method,
            index: r.index,
            declared: r.declared,
        }
    }
}

/// Check one candidate argument against its declared parameter.
///
/// Rules, in order:
/// 1. a parameter with a declared context binding is captured as a context
///    lookup, whatever placeholder value was passed;
/// 2. a context-typed parameter passes the runtime context through;
/// 3. scalars and type references matching the declared type become literals;
/// 4. everything else is rejected.
pub fn validate_argument(
    contract: &str,
    method: &str,
    index: usize,
    param: &ParamSpec,
    candidate: &ArgValue,
) -> Result<Argument, Rejection> {
    if let Some(key) = binding::binding_of(param) {
        return Ok(Argument::ContextLookup(key.to_string()));
    }
    if param.ty == ParamType::Context {
        return Ok(Argument::ContextHandle);
    }

    let value = match (param.ty, candidate) {
        (ParamType::Bool, ArgValue::Json(serde_json::Value::Bool(b))) => Some(Value::Bool(*b)),
        (ParamType::Int, ArgValue::Json(serde_json::Value::Number(n))) => {
            n.as_i64().map(Value::Int)
        }
        (ParamType::Float, ArgValue::Json(serde_json::Value::Number(n))) => {
            n.as_f64().map(Value::Float)
        }
        (ParamType::Str, ArgValue::Json(serde_json::Value::String(s))) => {
            Some(Value::Str(s.clone()))
        }
        (ParamType::TypeRef, ArgValue::TypeRef(path)) => Some(Value::TypeRef(path.clone())),
        _ => None,
    };

    match value {
        Some(value) => Ok(Argument::Literal(value)),
        None => Err(Rejection {
            contract: contract.to_string(),
            method: method.to_string(),
            index,
            declared: param.ty.describe().to_string(),
        }),
    }
}
