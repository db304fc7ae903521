//! Run command - dispatches every instruction in a script file
//!
//! One instruction per line. Blank lines and lines whose first non-blank
//! character is '#' are skipped. Other lines are dispatched exactly as
//! written, minus the line ending, so surrounding spaces are part of the
//! instruction. Execution stops at the first instruction that fails.
//!
//! Example:
//!   kw run checks.kw

use crate::common::{DispatchContext, format_value};
use anyhow::{Context, Result};
use diagnostics::*;
use std::path::Path;

/// Instructions from script text, with their 1-based line numbers
pub fn script_instructions(script: &str) -> impl Iterator<Item = (usize, &str)> {
    script
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| {
            let content = line.trim_start();
            !content.is_empty() && !content.starts_with('#')
        })
}

/// Dispatch each instruction of `path`, reporting `line: result`
pub fn run_command<F>(context: &DispatchContext, path: &Path, mut handler: F) -> Result<usize>
where
    F: FnMut(String),
{
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let registry = context.open_registry()?;

    let mut count = 0;
    for (line, instruction) in script_instructions(&script) {
        let value = registry.dispatch(instruction).with_context(|| {
            format!("{}:{}: failed to dispatch {:?}", path.display(), line, instruction)
        })?;
        handler(format!("{}: {}", line, format_value(&value)));
        count += 1;
    }

    let script_path = path.display().to_string();
    log_info!(
        "Ran {count} instructions from {path}",
        count: count,
        path: script_path.as_str()
    );
    Ok(count)
}
