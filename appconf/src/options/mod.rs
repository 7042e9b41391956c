//! Options controlling how a project configuration is loaded.
//!
//! Options come from three places, highest precedence first:
//!
//! 1. Programmatic settings (via [`LoadOptionsBuilder`] setters)
//! 2. Environment variables (`APPCONF_*`)
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use appconf::options::{CliEnvironment, LoadOptionsBuilder};
//!
//! let options = LoadOptionsBuilder::new()
//!     .skip_env()
//!     .with_environment(CliEnvironment::Stage)
//!     .with_allow_no_impl(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(options.allow_no_impl);
//! assert!(options.validate);
//! assert_eq!(options.environment.default_hostname(), "dev.runtime.adobe.io");
//! ```

pub mod builder;
pub mod environment;

pub use builder::LoadOptionsBuilder;
pub use environment::EnvironmentOverrides;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Default application hostname in production.
pub const PROD_HOSTNAME: &str = "adobeio-static.net";
/// Default application hostname in stage.
pub const STAGE_HOSTNAME: &str = "dev.runtime.adobe.io";

/// The deployment environment the configuration is resolved for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CliEnvironment {
    /// Production.
    #[default]
    Prod,
    /// Stage.
    Stage,
}

impl CliEnvironment {
    /// The application hostname used when none is configured.
    #[must_use]
    pub const fn default_hostname(self) -> &'static str {
        match self {
            Self::Prod => PROD_HOSTNAME,
            Self::Stage => STAGE_HOSTNAME,
        }
    }
}

impl fmt::Display for CliEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prod => f.write_str("prod"),
            Self::Stage => f.write_str("stage"),
        }
    }
}

impl FromStr for CliEnvironment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prod" => Ok(Self::Prod),
            "stage" => Ok(Self::Stage),
            _ => Err(Error::Validation {
                field: "environment".into(),
                message: format!("Invalid environment: '{s}' (expected prod or stage)"),
            }),
        }
    }
}

/// Options for [`load`](crate::loader::load).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOptions {
    /// Succeed even when no application or extension is configured.
    pub allow_no_impl: bool,
    /// Validate the merged configuration against the schema.
    pub validate: bool,
    /// Rewrite path fields to absolute paths (otherwise relative to the root
    /// configuration file).
    pub absolute_paths: bool,
    /// Ignore legacy settings in the `.aio` file.
    pub ignore_aio_config: bool,
    /// Environment used for hostname defaults.
    pub environment: CliEnvironment,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            allow_no_impl: false,
            validate: true,
            absolute_paths: true,
            ignore_aio_config: false,
            environment: CliEnvironment::Prod,
        }
    }
}
