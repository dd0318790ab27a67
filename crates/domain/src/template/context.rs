//! Template context: the variables and functions a render pass resolves against.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::argument::Argument;

/// A callable exposed to templates through `{{ $name(...) }}` syntax.
pub type TemplateFunction = Arc<dyn Fn(&[Argument]) -> Value + Send + Sync>;

/// Named functions available to call expressions.
///
/// Names are stored exactly as written in templates, sigil included
/// (`$uuid`, not `uuid`).
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, TemplateFunction>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Argument]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TemplateFunction> {
        self.functions.get(name)
    }

    /// Returns whether a function with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Copies every function from `other`; entries in `other` win on conflict.
    pub fn extend(&mut self, other: &Self) {
        for (name, function) in &other.functions {
            self.functions.insert(name.clone(), Arc::clone(function));
        }
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no functions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Variables and functions for a single render pass.
///
/// Built fresh per request by whoever owns the variable state, read-only
/// while rendering, and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Variable mapping that placeholder paths resolve against.
    pub vars: Map<String, Value>,

    /// Functions reachable from call expressions.
    pub funcs: FunctionRegistry,
}

impl TemplateContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from a variable mapping.
    #[must_use]
    pub fn from_vars(vars: Map<String, Value>) -> Self {
        Self {
            vars,
            funcs: FunctionRegistry::new(),
        }
    }

    /// Sets a single variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Merges the entries of a JSON object into the variables.
    /// Non-object values are ignored.
    #[must_use]
    pub fn with_vars(mut self, vars: Value) -> Self {
        if let Value::Object(map) = vars {
            self.vars.extend(map);
        }
        self
    }

    /// Registers a function.
    #[must_use]
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Argument]) -> Value + Send + Sync + 'static,
    {
        self.funcs.register(name, function);
        self
    }

    /// Adds every function from a registry.
    #[must_use]
    pub fn with_functions(mut self, functions: &FunctionRegistry) -> Self {
        self.funcs.extend(functions);
        self
    }

    /// Looks up a function by its sigil-prefixed name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&TemplateFunction> {
        self.funcs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let ctx = TemplateContext::new()
            .with_var("host", "localhost")
            .with_vars(json!({"port": 8080}))
            .with_function("$echo", |args: &[Argument]| {
                args.first()
                    .and_then(Argument::as_value)
                    .cloned()
                    .unwrap_or(Value::Null)
            });

        assert_eq!(ctx.vars.get("host"), Some(&json!("localhost")));
        assert_eq!(ctx.vars.get("port"), Some(&json!(8080)));
        assert!(ctx.funcs.contains("$echo"));
        assert!(ctx.function("echo").is_none());
    }

    #[test]
    fn test_with_vars_ignores_non_objects() {
        let ctx = TemplateContext::new().with_vars(json!([1, 2]));
        assert!(ctx.vars.is_empty());
    }

    #[test]
    fn test_registry_extend_overrides() {
        let mut base = FunctionRegistry::new();
        base.register("$a", |_: &[Argument]| json!(1));
        base.register("$b", |_: &[Argument]| json!(2));

        let mut overrides = FunctionRegistry::new();
        overrides.register("$b", |_: &[Argument]| json!(20));

        base.extend(&overrides);
        assert_eq!(base.names(), vec!["$a", "$b"]);
        let b = base.get("$b").map(|f| f(&[]));
        assert_eq!(b, Some(json!(20)));
    }

    #[test]
    fn test_registry_debug_lists_names() {
        let mut registry = FunctionRegistry::new();
        registry.register("$now", |_: &[Argument]| json!("t"));
        assert_eq!(
            format!("{registry:?}"),
            r#"FunctionRegistry { functions: ["$now"] }"#
        );
    }
}
