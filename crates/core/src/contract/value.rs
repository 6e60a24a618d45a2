use serde::{Deserialize, Serialize};

/// A constant that can be embedded directly into a synthesized replay unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A reference to a named type, embedded as a constant path
    TypeRef(String),
}

impl Value {
    pub fn type_ref(path: impl Into<String>) -> Self {
        Value::TypeRef(path.into())
    }

    /// Shape name used in error reports
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::TypeRef(_) => "type reference",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// A candidate argument handed to a recording proxy, before validation.
///
/// Only scalar JSON values, type references and declared context shapes
/// survive validation; arrays, objects and null are rejected at the call site
/// because there is no way to reconstruct them without build-time types.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A candidate literal
    Json(serde_json::Value),
    /// A reference to a named type
    TypeRef(String),
    /// The runtime context itself, for parameters declared with that type
    Context,
}

impl ArgValue {
    /// Placeholder for parameters whose value comes from a context binding
    pub fn null() -> Self {
        ArgValue::Json(serde_json::Value::Null)
    }

    pub fn type_ref(path: impl Into<String>) -> Self {
        ArgValue::TypeRef(path.into())
    }

    /// Shape name used in error reports
    pub fn describe(&self) -> String {
        match self {
            ArgValue::Json(serde_json::Value::Null) => "null".to_string(),
            ArgValue::Json(serde_json::Value::Bool(_)) => "bool".to_string(),
            ArgValue::Json(serde_json::Value::Number(_)) => "number".to_string(),
            ArgValue::Json(serde_json::Value::String(_)) => "string".to_string(),
            ArgValue::Json(serde_json::Value::Array(_)) => "array".to_string(),
            ArgValue::Json(serde_json::Value::Object(_)) => "object".to_string(),
            ArgValue::TypeRef(_) => "type reference".to_string(),
            ArgValue::Context => "runtime context".to_string(),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Json(serde_json::Value::from(v))
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Json(serde_json::Value::from(v))
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Json(serde_json::Value::from(v))
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Json(serde_json::Value::from(v))
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Json(serde_json::Value::from(v))
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Json(serde_json::Value::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_roundtrip() {
        let value = Value::Str("shared-cache".to_string());
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);

        let json = serde_json::to_value(&Value::Int(16)).unwrap();
        assert_eq!(json["type"], "int");
        assert_eq!(json["value"], 16);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(4).as_int(), Some(4));
        assert_eq!(Value::from("pool").as_str(), Some("pool"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(4).as_str(), None);
    }

    #[test]
    fn test_arg_value_describe() {
        assert_eq!(ArgValue::from(4).describe(), "number");
        assert_eq!(ArgValue::null().describe(), "null");
        assert_eq!(
            ArgValue::Json(serde_json::json!({"a": 1})).describe(),
            "object"
        );
        assert_eq!(ArgValue::Context.describe(), "runtime context");
    }
}
