//! Show command implementation.
//!
//! Runs the full load pipeline for the project and prints every component
//! with its defaults filled in.

use crate::error::CliError;
use crate::utils::{resolve_project_dir, GlobalOptions, OutputFormat};
use appconf::{load, CliEnvironment, LoadOptionsBuilder};
use clap::Args;

/// Load the whole project and print its components.
#[derive(Args)]
pub struct ShowCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "yaml",
        env = "APPCONF_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    /// Succeed even if no application or extension is configured
    #[arg(long)]
    pub allow_no_impl: bool,

    /// Skip schema validation
    #[arg(long)]
    pub no_validate: bool,

    /// Use stage defaults instead of production ones
    #[arg(long)]
    pub stage: bool,

    /// Ignore legacy application settings in the `.aio` file
    #[arg(long)]
    pub ignore_aio_config: bool,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let project_dir = resolve_project_dir(global)?;

        let mut builder = LoadOptionsBuilder::new();
        if self.allow_no_impl {
            builder = builder.with_allow_no_impl(true);
        }
        if self.no_validate {
            builder = builder.with_validate(false);
        }
        if self.stage {
            builder = builder.with_environment(CliEnvironment::Stage);
        }
        if self.ignore_aio_config {
            builder = builder.with_ignore_aio_config(true);
        }
        let options = builder.build()?;

        let loaded = load(&project_dir, &options)?;
        print!("{}", self.format.render(&loaded)?);
        Ok(())
    }
}
