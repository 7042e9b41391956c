//! Main entry point for the appconf CLI.
//!
//! This is the command-line interface for resolving multi-component
//! application configuration:
//! - `resolve`: Print the configuration with every `$include` resolved
//! - `index`: Print where every configuration key was defined
//! - `show`: Load the whole project and print its components
//! - `validate`: Validate the configuration against the schema

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Route library logging to stderr based on verbosity
    appconf::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        project_dir: cli.project_dir,
    };

    let result = match cli.command {
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Index(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
