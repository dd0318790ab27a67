//! Property path resolution
//!
//! Resolves `a.b.c`, `a[0]`, `a['k']` and `a["k"]` style paths against a
//! variable mapping.

use serde_json::{Map, Value};

/// One step of a parsed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named key, from a dotted segment or a quoted bracket.
    Key(String),
    /// A numeric bracket index.
    Index(usize),
}

/// Splits a path into segments.
///
/// Returns `None` when the path is empty or has an unterminated bracket or
/// quote.
///
/// # Examples
///
/// ```
/// use tessera_domain::template::path::{parse_path, PathSegment};
///
/// let segments = parse_path("items[0]['name']").unwrap();
/// assert_eq!(
///     segments,
///     vec![
///         PathSegment::Key("items".into()),
///         PathSegment::Index(0),
///         PathSegment::Key("name".into()),
///     ]
/// );
/// ```
#[must_use]
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => flush(&mut current, &mut segments),
            '[' => {
                flush(&mut current, &mut segments);
                while chars.next_if(|c| c.is_whitespace()).is_some() {}

                if let Some(quote) = chars.next_if(|c| *c == '\'' || *c == '"') {
                    let mut key = String::new();
                    loop {
                        match chars.next()? {
                            '\\' => key.push(chars.next()?),
                            c if c == quote => break,
                            c => key.push(c),
                        }
                    }
                    while chars.next_if(|c| c.is_whitespace()).is_some() {}
                    if chars.next()? != ']' {
                        return None;
                    }
                    segments.push(PathSegment::Key(key));
                } else {
                    let mut raw = String::new();
                    loop {
                        match chars.next()? {
                            ']' => break,
                            c => raw.push(c),
                        }
                    }
                    let raw = raw.trim();
                    match raw.parse::<usize>() {
                        Ok(index) => segments.push(PathSegment::Index(index)),
                        Err(_) => segments.push(PathSegment::Key(raw.to_string())),
                    }
                }
            }
            c => current.push(c),
        }
    }
    flush(&mut current, &mut segments);

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

fn flush(current: &mut String, segments: &mut Vec<PathSegment>) {
    if !current.is_empty() {
        segments.push(PathSegment::Key(std::mem::take(current)));
    }
}

/// Resolves a path against a variable mapping.
///
/// A key that matches the whole trimmed path wins over segment traversal, so
/// variables named `"a.b"` stay reachable. Any missing step yields `None`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tessera_domain::template::path::resolve_path;
///
/// let vars = json!({"list": [10, 20], "a": {"b": 5}});
/// let vars = vars.as_object().unwrap();
/// assert_eq!(resolve_path(" list[1] ", vars), Some(&json!(20)));
/// assert_eq!(resolve_path("a.b", vars), Some(&json!(5)));
/// assert_eq!(resolve_path("a.c.d", vars), None);
/// ```
#[must_use]
pub fn resolve_path<'a>(path: &str, vars: &'a Map<String, Value>) -> Option<&'a Value> {
    let path = path.trim();
    if let Some(value) = vars.get(path) {
        return Some(value);
    }

    let segments = parse_path(path)?;
    let (first, rest) = segments.split_first()?;
    let root = match first {
        PathSegment::Key(key) => vars.get(key)?,
        PathSegment::Index(index) => vars.get(&index.to_string())?,
    };

    rest.iter().try_fold(root, step)
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        (Value::Array(items), PathSegment::Key(key)) => {
            key.parse::<usize>().ok().and_then(|index| items.get(index))
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn vars(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            parse_path("a.b.c"),
            Some(vec![
                PathSegment::Key("a".into()),
                PathSegment::Key("b".into()),
                PathSegment::Key("c".into()),
            ])
        );
    }

    #[test]
    fn test_parse_double_quoted_key_with_dot() {
        assert_eq!(
            parse_path(r#"headers["x.trace"]"#),
            Some(vec![
                PathSegment::Key("headers".into()),
                PathSegment::Key("x.trace".into()),
            ])
        );
    }

    #[test]
    fn test_parse_unterminated() {
        assert_eq!(parse_path("a[0"), None);
        assert_eq!(parse_path("a['k]"), None);
        assert_eq!(parse_path("   "), None);
    }

    #[test]
    fn test_resolve_nested() {
        let vars = vars(json!({"user": {"tags": ["x", {"id": 7}]}}));
        assert_eq!(resolve_path("user.tags[1].id", &vars), Some(&json!(7)));
        assert_eq!(resolve_path("user['tags'][0]", &vars), Some(&json!("x")));
        assert_eq!(resolve_path("user.tags.0", &vars), Some(&json!("x")));
    }

    #[test]
    fn test_resolve_missing_intermediate() {
        let vars = vars(json!({"a": 1}));
        assert_eq!(resolve_path("a.b.c", &vars), None);
        assert_eq!(resolve_path("missing[3]", &vars), None);
    }

    #[test]
    fn test_resolve_out_of_bounds() {
        let vars = vars(json!({"list": [1]}));
        assert_eq!(resolve_path("list[5]", &vars), None);
    }

    #[test]
    fn test_literal_key_wins() {
        let vars = vars(json!({"a.b": "flat", "a": {"b": "nested"}}));
        assert_eq!(resolve_path("a.b", &vars), Some(&json!("flat")));
    }

    #[test]
    fn test_numeric_bracket_on_object() {
        let vars = vars(json!({"codes": {"200": "ok"}}));
        assert_eq!(resolve_path("codes[200]", &vars), Some(&json!("ok")));
    }
}
