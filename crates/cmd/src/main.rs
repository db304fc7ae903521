// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands;
use cmd::common::{DEFAULT_LIBRARY, DispatchContext};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "kw")]
/// Dispatch plain-text instructions to keyword handlers
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keyword library to dispatch against
    #[arg(short, long, global = true, default_value = DEFAULT_LIBRARY)]
    library: String,

    /// Treat literal template text as regular-expression syntax
    #[arg(long, global = true)]
    raw_templates: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List keyword libraries linked into this binary
    Libraries,
    /// List the keywords of a library with their templates
    List,
    /// Dispatch one instruction, e.g. `kw dispatch Add -1 and 2`
    ///
    /// Every word after the subcommand belongs to the instruction, so global
    /// options go before `dispatch`.
    Dispatch {
        /// Instruction words (default: "Add 1 and 2")
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        instruction: Vec<String>,
    },
    /// Dispatch every instruction in a script file, one per line
    Run {
        /// Script path; '#' starts a comment line
        script: PathBuf,
    },
}

#[allow(clippy::print_stdout)]
fn print_line(line: String) {
    println!("{}", line);
}

fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    let context = DispatchContext::new(cli.library, cli.raw_templates);

    match &cli.command {
        Commands::Libraries => commands::libraries_command(print_line),
        Commands::List => commands::list_command(&context, print_line),
        Commands::Dispatch { instruction } => {
            commands::dispatch_command(&context, instruction, print_line)
        }
        Commands::Run { script } => commands::run_command(&context, script, print_line).map(|_| ()),
    }
}
