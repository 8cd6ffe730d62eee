//! JSON Value Extension
//!
//! Accessors for status payloads. Backends disagree on whether numeric
//! fields are JSON numbers or numeric strings, so the integer accessors
//! accept both.

use serde_json::Value;

/// Extension trait for `serde_json::Value` with lenient accessors
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use pctx_providers::utils::JsonExt;
///
/// let status = json!({"blockHeight": "42", "version": "1.4.0"});
/// assert_eq!(status.lenient_u64("blockHeight"), Some(42));
/// assert_eq!(status.opt_str("version"), Some("1.4.0"));
/// ```
pub trait JsonExt {
    /// Get optional string
    fn opt_str(&self, key: &str) -> Option<&str>;

    /// Get optional bool
    fn opt_bool(&self, key: &str) -> Option<bool>;

    /// Get an unsigned integer given as a number or a numeric string
    fn lenient_u64(&self, key: &str) -> Option<u64>;

    /// Get a string, rendering numbers as strings
    fn lenient_string(&self, key: &str) -> Option<String>;
}

impl JsonExt for Value {
    #[inline]
    fn opt_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[inline]
    fn opt_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn lenient_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn lenient_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
