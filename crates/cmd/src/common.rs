use anyhow::{Context, Result};
use keywords::{LibraryCatalog, LiteralMode, Registry};
use serde_json::Value;

/// Library used when none is named on the command line
pub const DEFAULT_LIBRARY: &str = "arithmetic";

/// Options shared by every command that dispatches instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchContext {
    pub library: String,
    pub mode: LiteralMode,
}

impl DispatchContext {
    #[must_use]
    pub fn new<S: Into<String>>(library: S, raw_templates: bool) -> Self {
        Self {
            library: library.into(),
            mode: if raw_templates {
                LiteralMode::Raw
            } else {
                LiteralMode::Escaped
            },
        }
    }

    /// Build the registry for the selected library
    pub fn open_registry(&self) -> Result<Registry> {
        LibraryCatalog::instantiate(&self.library, self.mode)
            .with_context(|| format!("Failed to load keyword library '{}'", self.library))
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY, false)
    }
}

/// Render a keyword result for the terminal
///
/// Strings print without JSON quoting; everything else prints as JSON.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
