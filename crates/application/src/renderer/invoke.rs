//! Function invocation for call expressions

use tessera_domain::{TemplateContext, display_value};
use tracing::{debug, trace};

use super::call::{ParsedCall, find_calls};

/// Invokes `call` and splices its output into `text` at the call's span.
///
/// Returns `None` when no function with that name is registered (the
/// expression is left in place by the caller) or when the span does not
/// fit `text`. The function's return value is always converted to text.
#[must_use]
pub fn render_call(text: &str, call: &ParsedCall, context: &TemplateContext) -> Option<String> {
    let Some(function) = context.function(&call.name) else {
        debug!(name = %call.name, "no template function registered, leaving call in place");
        return None;
    };

    let before = text.get(..call.span.start)?;
    let after = text.get(call.span.end..)?;

    let output = display_value(&function(&call.args));
    trace!(name = %call.name, output = %output, "invoked template function");

    Some(format!("{before}{output}{after}"))
}

/// Invokes every resolvable call expression in `text` in a single pass.
///
/// Returns the spliced text, or `None` when nothing was invoked.
#[must_use]
pub fn invoke_calls(text: &str, context: &TemplateContext) -> Option<String> {
    let calls = find_calls(text);
    let mut working: Option<String> = None;

    // Right to left so earlier spans stay valid after each splice.
    for call in calls.iter().rev() {
        let current = working.as_deref().unwrap_or(text);
        if let Some(next) = render_call(current, call, context) {
            working = Some(next);
        }
    }

    working
}
