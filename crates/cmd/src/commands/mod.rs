pub mod dispatch;
pub mod libraries;
pub mod list;
pub mod run;

pub use dispatch::{DEFAULT_INSTRUCTION, dispatch_command};
pub use libraries::libraries_command;
pub use list::list_command;
pub use run::run_command;
