//! Placeholder scanner for `{{ path }}` and `{{{ path }}}` expressions
//!
//! Opening and closing brace counts are matched independently, so `{{{a}}`
//! is accepted as a placeholder for `a`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{{2,3}[\w.\[\]'"$\s]+\}{2,3}"#).expect("placeholder pattern is valid")
});

/// A variable placeholder found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The matched text, braces included.
    pub text: &'a str,

    /// The path inside the braces, trimmed.
    pub path: &'a str,

    /// Byte range of `text` in the scanned string.
    pub span: Range<usize>,
}

/// Finds every variable placeholder, left to right.
///
/// # Examples
///
/// ```
/// use tessera_application::renderer::placeholder::find_placeholders;
///
/// let found = find_placeholders("{{host}}:{{{ port }}}");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].path, "host");
/// assert_eq!(found[1].path, "port");
/// ```
#[must_use]
pub fn find_placeholders(input: &str) -> Vec<Placeholder<'_>> {
    PLACEHOLDER
        .find_iter(input)
        .map(|m| Placeholder {
            text: m.as_str(),
            path: strip_braces(m.as_str()),
            span: m.range(),
        })
        .collect()
}

/// Returns true if the input contains at least one variable placeholder.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    PLACEHOLDER.is_match(input)
}

/// Strips surrounding braces and whitespace from a matched placeholder.
#[must_use]
pub fn strip_braces(matched: &str) -> &str {
    matched.trim_start_matches('{').trim_end_matches('}').trim()
}
