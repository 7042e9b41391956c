//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including project directory resolution, root document lookup and output
//! formatting.

use crate::error::CliError;
use appconf::paths::normalize::expand_tilde;
use appconf::{DocumentId, FsSource, APP_CONFIG_FILE};
use clap::ValueEnum;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose/quiet are consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// The project directory, if given.
    pub project_dir: Option<PathBuf>,
}

/// Output format for commands that print configuration.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Renders `value` in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String, CliError> {
        match self {
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| CliError::Output(e.to_string())),
            Self::Json => serde_json::to_string_pretty(value)
                .map(|json| json + "\n")
                .map_err(|e| CliError::Output(e.to_string())),
        }
    }
}

/// Resolve the project directory, using CWD if not specified.
///
/// Explicit paths have `~` expanded and are made absolute, but are not
/// canonicalized.
pub fn resolve_project_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    let cwd = env::current_dir()?;
    let dir = match &global.project_dir {
        Some(dir) => expand_tilde(dir)?,
        None => return Ok(cwd),
    };

    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(cwd.join(dir))
    }
}

/// The source and root document for commands taking an optional config path.
///
/// Without `config`, the root is `app.config.yaml` in the project directory.
/// A given path is relative to the project directory and must exist.
pub fn root_document(
    global: &GlobalOptions,
    config: Option<&Path>,
) -> Result<(FsSource, DocumentId, PathBuf), CliError> {
    let project_dir = resolve_project_dir(global)?;
    let source = FsSource::new(&project_dir);

    let root = match config {
        Some(path) => {
            let path = expand_tilde(path)?;
            if !project_dir.join(&path).is_file() {
                return Err(CliError::InvalidArguments(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
            DocumentId::from_path(&path)
        }
        None => DocumentId::new(APP_CONFIG_FILE),
    };

    Ok((source, root, project_dir))
}
