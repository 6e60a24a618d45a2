//! Context binding resolution and key validation
//!
//! A binding associates a declared parameter (or return slot) with a named
//! key in the runtime context. Binding is pure declared-metadata lookup: it
//! never checks whether the key will be present at startup, only that the key
//! itself is well formed.

use std::sync::OnceLock;

use regex::Regex;

use crate::contract::ParamSpec;
use crate::error::{Error, Result};

static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn key_pattern() -> &'static Regex {
    KEY_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("key pattern compiles")
    })
}

/// Check that a declared context key is well formed.
///
/// Malformed keys can never be satisfied at startup, so they are rejected at
/// declaration time.
pub fn validate_key(key: &str) -> Result<()> {
    if key_pattern().is_match(key) {
        Ok(())
    } else {
        Err(Error::MalformedKey {
            key: key.to_string(),
        })
    }
}

/// The declared context binding of a parameter, if any
pub fn binding_of(param: &ParamSpec) -> Option<&str> {
    param.binding.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(validate_key("pool-size").is_ok());
        assert!(validate_key("db.url").is_ok());
        assert!(validate_key("A_1").is_ok());
        assert!(validate_key("9lives").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("-leading-dash").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key("tab\there").is_err());
    }

    #[test]
    fn test_binding_of() {
        let plain = ParamSpec::int("size");
        assert_eq!(binding_of(&plain), None);

        let bound = ParamSpec::int("size").bound("pool-size");
        assert_eq!(binding_of(&bound), Some("pool-size"));
    }
}
