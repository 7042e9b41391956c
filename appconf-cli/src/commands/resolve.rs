//! Resolve command implementation.
//!
//! Prints the merged configuration tree after `$include` resolution and path
//! rewriting.

use crate::error::CliError;
use crate::utils::{root_document, GlobalOptions, OutputFormat};
use appconf::{coalesce, LoadOptionsBuilder};
use clap::Args;
use std::path::PathBuf;

/// Print the configuration with every `$include` resolved.
#[derive(Args)]
pub struct ResolveCommand {
    /// Root configuration file, relative to the project directory
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Rewrite paths relative to the root configuration file instead of
    /// making them absolute
    #[arg(long)]
    pub relative: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "yaml",
        env = "APPCONF_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (source, root, project_dir) = root_document(global, self.config.as_deref())?;

        let mut builder = LoadOptionsBuilder::new();
        if self.relative {
            builder = builder.with_absolute_paths(false);
        }
        let options = builder.build()?;

        let resolved = coalesce(&source, &root, &project_dir, &options)?;
        print!("{}", self.format.render(&resolved.tree)?);
        Ok(())
    }
}
