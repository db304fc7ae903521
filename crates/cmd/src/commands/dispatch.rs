// CLI command for dispatching a single instruction
use crate::common::{DispatchContext, format_value};
use anyhow::{Context, Result};
use diagnostics::*;

/// Instruction used when none is given on the command line
pub const DEFAULT_INSTRUCTION: &str = "Add 1 and 2";

/// Dispatch one instruction and report the keyword's result
///
/// Words are joined with single spaces, so `kw dispatch Add 1 and 2` and
/// `kw dispatch "Add 1 and 2"` are the same instruction.
pub fn dispatch_command<F>(context: &DispatchContext, words: &[String], mut handler: F) -> Result<()>
where
    F: FnMut(String),
{
    let instruction = if words.is_empty() {
        DEFAULT_INSTRUCTION.to_string()
    } else {
        words.join(" ")
    };

    let registry = context.open_registry()?;
    let value = registry
        .dispatch(&instruction)
        .with_context(|| format!("Failed to dispatch {:?}", instruction))?;

    log_info!(
        "Dispatched {instruction} in {library}",
        instruction: instruction.as_str(),
        library: context.library.as_str()
    );
    handler(format_value(&value));
    Ok(())
}
