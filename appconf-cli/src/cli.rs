//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, IndexCommand, ResolveCommand, ShowCommand, ValidateCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for resolving and inspecting application configuration.
#[derive(Parser)]
#[command(name = "appconf")]
#[command(version, about = "Resolve and inspect application configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// The project directory (defaults to the current directory)
    #[arg(long, value_name = "PATH", global = true, env = "APPCONF_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the configuration with every `$include` resolved
    Resolve(ResolveCommand),

    /// Print where every configuration key was defined
    Index(IndexCommand),

    /// Load the whole project and print its components
    Show(ShowCommand),

    /// Validate the configuration against the schema
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
