//! Command to validate a project's configuration.

use crate::error::CliError;
use crate::utils::{root_document, GlobalOptions};
use appconf::schema::validate_tree;
use appconf::{coalesce, BuiltinSchema, Error, LoadOptionsBuilder};
use clap::Args;
use std::path::PathBuf;

/// Validate the configuration against the schema.
#[derive(Args)]
pub struct ValidateCommand {
    /// Root configuration file, relative to the project directory
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (source, root, project_dir) = root_document(global, self.config.as_deref())?;
        let options = LoadOptionsBuilder::new().build()?;

        let resolved = coalesce(&source, &root, &project_dir, &options)?;

        match validate_tree(&BuiltinSchema, &resolved.tree) {
            Ok(()) => {
                println!("Configuration is valid");
                Ok(())
            }
            Err(Error::SchemaValidation { violations }) => {
                for violation in &violations {
                    eprintln!("Validation error: {violation}");
                }
                Err(CliError::SemanticFailure(format!(
                    "Configuration validation failed ({} error(s))",
                    violations.len()
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}
