// CLI command for listing the keywords of one library
use crate::common::DispatchContext;
use anyhow::Result;

/// Print each keyword's name and template, in registration order
pub fn list_command<F>(context: &DispatchContext, mut handler: F) -> Result<()>
where
    F: FnMut(String),
{
    let registry = context.open_registry()?;
    let width = registry
        .keywords()
        .iter()
        .map(|keyword| keyword.name().len())
        .max()
        .unwrap_or(0);

    for keyword in registry.keywords() {
        handler(format!(
            "{:<width$}  {}",
            keyword.name(),
            keyword.template(),
            width = width
        ));
    }
    Ok(())
}
