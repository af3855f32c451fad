//! Evaluation settings.

use crate::error::ConditionError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EvalConfig {
    /// Read paths missing from the in-memory tree from the backing store.
    pub store_fallback: bool,
    /// Log each condition's AST at debug level before evaluating it.
    pub trace_ast: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            store_fallback: true,
            trace_ast: false,
        }
    }
}

impl EvalConfig {
    /// Loads settings from JSON. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConditionError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_store_fallback(mut self, enabled: bool) -> Self {
        self.store_fallback = enabled;
        self
    }

    pub fn with_trace_ast(mut self, enabled: bool) -> Self {
        self.trace_ast = enabled;
        self
    }
}
