//! Call expression arguments

use serde_json::Value;

/// A positional argument passed to a template function.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A string, number, boolean or null literal.
    Literal(Value),
    /// An argument that was syntactically valid but not a literal
    /// (a variable, nested call or operator expression).
    Undefined,
}

impl Argument {
    /// Returns the literal value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Undefined => None,
        }
    }

    /// Returns the argument as a string slice when it is a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns the argument as an integer when it is an integral number literal.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}
