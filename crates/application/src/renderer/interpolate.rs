//! Variable interpolation
//!
//! Substitutes `{{ path }}` placeholders with values from the variable
//! mapping. A string that is exactly one placeholder yields the native value;
//! anything else yields text.

use serde_json::{Map, Value};
use tessera_domain::template::{MissingValuePolicy, display_value, resolve_path};
use tracing::trace;

use super::placeholder::find_placeholders;

/// Renders the variable placeholders in `text`.
///
/// - No placeholders: the text is returned unchanged.
/// - The trimmed text is exactly one placeholder: the resolved value is
///   returned as-is (object, array, number, boolean, null or string).
/// - Otherwise each placeholder is replaced left to right with the value's
///   text form; containers are JSON-encoded. Substituted text is not
///   scanned again.
///
/// Unresolved paths follow `missing`: empty text, or the placeholder kept
/// verbatim.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tessera_application::renderer::render_variables;
/// use tessera_domain::MissingValuePolicy;
///
/// let vars = json!({"a": {"b": 5, "c": [1]}});
/// let vars = vars.as_object().unwrap();
///
/// assert_eq!(render_variables("{{a.b}}", vars, MissingValuePolicy::Empty), json!(5));
/// assert_eq!(
///     render_variables("c={{a.c}}", vars, MissingValuePolicy::Empty),
///     json!("c=[1]")
/// );
/// ```
#[must_use]
pub fn render_variables(
    text: &str,
    vars: &Map<String, Value>,
    missing: MissingValuePolicy,
) -> Value {
    let placeholders = find_placeholders(text);

    if placeholders.is_empty() {
        return Value::String(text.to_owned());
    }

    if let [only] = placeholders.as_slice()
        && only.text == text.trim()
    {
        return match resolve_path(only.path, vars) {
            Some(value) => value.clone(),
            None => {
                trace!(path = only.path, "unresolved whole-value placeholder");
                match missing {
                    MissingValuePolicy::Empty => Value::String(String::new()),
                    MissingValuePolicy::Keep => Value::String(text.to_owned()),
                }
            }
        };
    }

    let mut rendered = String::with_capacity(text.len());
    let mut last_end = 0;

    for placeholder in &placeholders {
        rendered.push_str(&text[last_end..placeholder.span.start]);

        match resolve_path(placeholder.path, vars) {
            Some(value) => rendered.push_str(&display_value(value)),
            None => {
                trace!(path = placeholder.path, "unresolved placeholder");
                if missing == MissingValuePolicy::Keep {
                    rendered.push_str(placeholder.text);
                }
            }
        }

        last_end = placeholder.span.end;
    }

    rendered.push_str(&text[last_end..]);
    Value::String(rendered)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn vars() -> Map<String, Value> {
        json!({
            "host": "localhost",
            "port": 8080,
            "a": {"b": 5, "c": {"d": true}},
            "list": [10, 20],
            "nothing": null,
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn render(text: &str) -> Value {
        render_variables(text, &vars(), MissingValuePolicy::Empty)
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(render("Hello, World!"), json!("Hello, World!"));
    }

    #[test]
    fn test_whole_value_keeps_native_type() {
        assert_eq!(render("{{a.b}}"), json!(5));
        assert_eq!(render("{{ a.c }}"), json!({"d": true}));
        assert_eq!(render("{{list[1]}}"), json!(20));
        assert_eq!(render("{{nothing}}"), Value::Null);
        assert_eq!(render("  {{{port}}}  "), json!(8080));
    }

    #[test]
    fn test_partial_substitution_is_text() {
        assert_eq!(render("http://{{host}}:{{port}}/"), json!("http://localhost:8080/"));
        assert_eq!(render("val={{a.c}}"), json!(r#"val={"d":true}"#));
        assert_eq!(render("{{list}}!"), json!("[10,20]!"));
        assert_eq!(render("{{nothing}}-"), json!("null-"));
    }

    #[test]
    fn test_two_placeholders_are_text() {
        assert_eq!(render("{{port}}{{port}}"), json!("80808080"));
    }

    #[test]
    fn test_missing_empty_policy() {
        assert_eq!(render("{{missing}}"), json!(""));
        assert_eq!(render("a={{missing.x}};b={{host}}"), json!("a=;b=localhost"));
    }

    #[test]
    fn test_missing_keep_policy() {
        let keep = |text: &str| render_variables(text, &vars(), MissingValuePolicy::Keep);
        assert_eq!(keep(" {{missing}} "), json!(" {{missing}} "));
        assert_eq!(keep("a={{missing}};b={{host}}"), json!("a={{missing}};b=localhost"));
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let vars = json!({"outer": "{{inner}}", "inner": "x"});
        let rendered = render_variables(
            "v={{outer}}",
            vars.as_object().unwrap(),
            MissingValuePolicy::Empty,
        );
        assert_eq!(rendered, json!("v={{inner}}"));
    }
}
