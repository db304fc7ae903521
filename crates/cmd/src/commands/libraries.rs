// CLI command for listing linked keyword libraries
use anyhow::Result;
use diagnostics::*;
use keywords::LibraryCatalog;

/// List all keyword libraries linked into this binary
pub fn libraries_command<F>(mut handler: F) -> Result<()>
where
    F: FnMut(String),
{
    log_debug!("Listing available keyword libraries");

    let libraries = LibraryCatalog::list();
    if libraries.is_empty() {
        handler("No keyword libraries available.".to_string());
        return Ok(());
    }

    for library in libraries {
        handler(format!("{} - {}", library.name, library.description));
    }
    Ok(())
}
