//! Index command implementation.
//!
//! Prints the include index: for every merged key, the file that defined it
//! and the key inside that file.

use crate::error::CliError;
use crate::utils::{root_document, GlobalOptions, OutputFormat};
use appconf::{coalesce, LoadOptionsBuilder};
use clap::Args;
use std::path::PathBuf;

/// Print where every configuration key was defined.
#[derive(Args)]
pub struct IndexCommand {
    /// Root configuration file, relative to the project directory
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Only show keys at or below this dotted key
    #[arg(long, value_name = "PREFIX")]
    pub key: Option<String>,

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

impl IndexCommand {
    /// Execute the index command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (source, root, project_dir) = root_document(global, self.config.as_deref())?;
        let options = LoadOptionsBuilder::new().build()?;

        let resolved = coalesce(&source, &root, &project_dir, &options)?;

        let mut entries = resolved.index.to_dotted();
        if let Some(prefix) = &self.key {
            entries.retain(|key, _| is_at_or_below(key, prefix));
        }
        if entries.is_empty() {
            log::warn!("No indexed keys match");
        }

        print!("{}", self.format.render(&entries)?);
        Ok(())
    }
}

fn is_at_or_below(key: &str, prefix: &str) -> bool {
    key == prefix
        || key
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}
