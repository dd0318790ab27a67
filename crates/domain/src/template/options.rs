//! Render configuration

use serde::{Deserialize, Serialize};

/// What a placeholder whose path does not resolve renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// Substitute empty text (whole-value strings become `""`).
    #[default]
    Empty,
    /// Leave the placeholder text as written.
    Keep,
}

/// Options for a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// How many times function output may be re-expanded before rendering
    /// fails with a recursion error.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Handling of unresolved variable paths.
    #[serde(default)]
    pub missing: MissingValuePolicy,
}

const fn default_max_depth() -> usize {
    32
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            missing: MissingValuePolicy::default(),
        }
    }
}

impl RenderOptions {
    /// Sets the re-expansion bound.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the missing-value policy.
    #[must_use]
    pub const fn with_missing(mut self, missing: MissingValuePolicy) -> Self {
        self.missing = missing;
        self
    }
}
