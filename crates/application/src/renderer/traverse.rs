//! Structural traversal
//!
//! Rebuilds a value graph with every string leaf rendered. Objects keep
//! their key order, arrays keep their element order, and numbers, booleans
//! and nulls are copied through.

use serde_json::{Map, Value};
use tessera_domain::{RenderError, RenderOptions, RenderResult, TemplateContext, display_value};
use tracing::warn;

use super::interpolate::render_variables;
use super::invoke::invoke_calls;

/// Renders every string leaf of `value`.
///
/// # Errors
/// Returns `RenderError::RecursionLimit` if function output keeps
/// re-triggering expansion beyond `options.max_depth`.
pub fn render_value(
    value: &Value,
    context: &TemplateContext,
    options: &RenderOptions,
) -> RenderResult<Value> {
    match value {
        Value::Object(map) => render_map(map, context, options).map(Value::Object),
        Value::Array(items) => items
            .iter()
            .map(|item| render_value(item, context, options))
            .collect::<RenderResult<Vec<_>>>()
            .map(Value::Array),
        Value::String(text) => render_string(text, context, options),
        scalar => Ok(scalar.clone()),
    }
}

/// Renders every value of an object, preserving keys and their order.
///
/// # Errors
/// See [`render_value`].
pub fn render_map(
    map: &Map<String, Value>,
    context: &TemplateContext,
    options: &RenderOptions,
) -> RenderResult<Map<String, Value>> {
    map.iter()
        .map(|(key, value)| {
            render_value(value, context, options).map(|rendered| (key.clone(), rendered))
        })
        .collect()
}

/// Renders a single string: call expressions first, then variables.
///
/// When any function was invoked, the spliced result is rendered again from
/// the top and the outcome is text. Otherwise the string goes through
/// variable interpolation, which may return a native value.
///
/// # Errors
/// See [`render_value`].
pub fn render_string(
    text: &str,
    context: &TemplateContext,
    options: &RenderOptions,
) -> RenderResult<Value> {
    expand(text, context, options, 0)
}

fn expand(
    text: &str,
    context: &TemplateContext,
    options: &RenderOptions,
    depth: usize,
) -> RenderResult<Value> {
    if let Some(spliced) = invoke_calls(text, context) {
        if depth >= options.max_depth {
            warn!(
                limit = options.max_depth,
                template = text,
                "template function output keeps re-expanding"
            );
            return Err(RenderError::RecursionLimit {
                limit: options.max_depth,
                template: text.to_owned(),
            });
        }

        let rendered = expand(&spliced, context, options, depth + 1)?;
        return Ok(Value::String(display_value(&rendered)));
    }

    Ok(render_variables(text, &context.vars, options.missing))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tessera_domain::{Argument, MissingValuePolicy};

    fn render(value: &Value, context: &TemplateContext) -> RenderResult<Value> {
        render_value(value, context, &RenderOptions::default())
    }

    #[test]
    fn test_scalars_pass_through() {
        let ctx = TemplateContext::new();
        for value in [json!(1), json!(2.5), json!(true), Value::Null] {
            assert_eq!(render(&value, &ctx).unwrap(), value);
        }
    }

    #[test]
    fn test_object_keys_keep_order() {
        let ctx = TemplateContext::new().with_var("v", "X");
        let input = json!({"z": "{{v}}", "a": 1, "m": {"y": "{{v}}-", "b": false}});
        let rendered = render(&input, &ctx).unwrap();

        assert_eq!(rendered, json!({"z": "X", "a": 1, "m": {"y": "X-", "b": false}}));
        let keys: Vec<&String> = rendered.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_arrays_are_rendered() {
        let ctx = TemplateContext::new().with_var("a", "X");
        let input = json!({"headers": ["{{a}}", "literal", 3, ["{{a}}"]]});
        assert_eq!(
            render(&input, &ctx).unwrap(),
            json!({"headers": ["X", "literal", 3, ["X"]]})
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let ctx = TemplateContext::new().with_var("a", "X");
        let input = json!({"k": "{{a}}"});
        let before = input.clone();
        let _ = render(&input, &ctx).unwrap();
        assert_eq!(input, before);
    }

    #[test]
    fn test_call_then_variables_reexpand() {
        let ctx = TemplateContext::new()
            .with_var("x", "Z")
            .with_function("$now", |_: &[Argument]| json!("{{x}}"));
        assert_eq!(render(&json!("ts={{ $now() }}"), &ctx).unwrap(), json!("ts=Z"));
    }

    #[test]
    fn test_call_result_is_text_even_when_whole() {
        let ctx = TemplateContext::new()
            .with_var("n", 7)
            .with_function("$n", |_: &[Argument]| json!(7))
            .with_function("$ref", |_: &[Argument]| json!("{{n}}"));
        assert_eq!(render(&json!("{{ $n() }}"), &ctx).unwrap(), json!("7"));
        assert_eq!(render(&json!("{{ $ref() }}"), &ctx).unwrap(), json!("7"));
        assert_eq!(render(&json!("{{n}}"), &ctx).unwrap(), json!(7));
    }

    #[test]
    fn test_unresolved_call_leaves_text_and_renders_variables() {
        let ctx = TemplateContext::new().with_var("a", "A");
        assert_eq!(
            render(&json!("{{ $missing(1) }}"), &ctx).unwrap(),
            json!("{{ $missing(1) }}")
        );
        assert_eq!(
            render(&json!("{{ $missing(1) }} {{a}}"), &ctx).unwrap(),
            json!("{{ $missing(1) }} A")
        );
    }

    #[test]
    fn test_runaway_expansion_is_fatal() {
        let ctx = TemplateContext::new()
            .with_function("$loop", |_: &[Argument]| json!("again {{ $loop() }}"));
        let options = RenderOptions::default().with_max_depth(5);
        let err = render_value(&json!({"k": ["{{ $loop() }}"]}), &ctx, &options).unwrap_err();
        assert!(matches!(err, RenderError::RecursionLimit { limit: 5, .. }));
    }

    #[test]
    fn test_many_calls_in_one_string_do_not_count_as_depth() {
        let ctx = TemplateContext::new().with_function("$one", |_: &[Argument]| json!(1));
        let text = "{{ $one() }}".repeat(10);
        let options = RenderOptions::default().with_max_depth(1);
        assert_eq!(
            render_value(&json!(text), &ctx, &options).unwrap(),
            json!("1111111111")
        );
    }

    #[test]
    fn test_missing_policy_applies_in_traversal() {
        let ctx = TemplateContext::new();
        let options = RenderOptions::default().with_missing(MissingValuePolicy::Keep);
        assert_eq!(
            render_value(&json!(["{{gone}}", "x{{gone}}"]), &ctx, &options).unwrap(),
            json!(["{{gone}}", "x{{gone}}"])
        );
        assert_eq!(
            render(&json!(["{{gone}}", "x{{gone}}"]), &ctx).unwrap(),
            json!(["", "x"])
        );
    }
}
