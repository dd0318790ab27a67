//! Template domain types
//!
//! Context, arguments, path resolution and render options shared by the
//! rendering engine.

mod argument;
mod context;
mod options;
pub mod path;

pub use argument::Argument;
pub use context::{FunctionRegistry, TemplateContext, TemplateFunction};
pub use options::{MissingValuePolicy, RenderOptions};
pub use path::{PathSegment, parse_path, resolve_path};

use serde_json::Value;

/// Converts a value to the text spliced into a partially substituted string.
///
/// Strings are used as-is, objects and arrays are JSON-encoded, and other
/// scalars use their printed form (`null` prints as `null`).
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("plain")), "plain");
        assert_eq!(display_value(&json!(5)), "5");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&Value::Null), "null");
        assert_eq!(display_value(&json!({"c": 1})), r#"{"c":1}"#);
        assert_eq!(display_value(&json!([1, "a"])), r#"[1,"a"]"#);
    }
}
