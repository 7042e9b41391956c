//! Builder for [`LoadOptions`].

use crate::error::Result;
use crate::options::{CliEnvironment, EnvironmentOverrides, LoadOptions};

/// Builds [`LoadOptions`] from defaults, environment variables and explicit
/// settings.
///
/// Explicit settings always win over environment variables, regardless of
/// the order in which builder methods are called.
///
/// # Examples
///
/// ```no_run
/// use appconf::options::LoadOptionsBuilder;
///
/// let options = LoadOptionsBuilder::new()
///     .with_validate(false)
///     .build()
///     .unwrap();
/// assert!(!options.validate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoadOptionsBuilder {
    skip_env: bool,
    allow_no_impl: Option<bool>,
    validate: Option<bool>,
    absolute_paths: Option<bool>,
    ignore_aio_config: Option<bool>,
    environment: Option<CliEnvironment>,
}

impl LoadOptionsBuilder {
    /// Creates a builder starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not read `APPCONF_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Sets [`LoadOptions::allow_no_impl`].
    #[must_use]
    pub fn with_allow_no_impl(mut self, allow: bool) -> Self {
        self.allow_no_impl = Some(allow);
        self
    }

    /// Sets [`LoadOptions::validate`].
    #[must_use]
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Sets [`LoadOptions::absolute_paths`].
    #[must_use]
    pub fn with_absolute_paths(mut self, absolute: bool) -> Self {
        self.absolute_paths = Some(absolute);
        self
    }

    /// Sets [`LoadOptions::ignore_aio_config`].
    #[must_use]
    pub fn with_ignore_aio_config(mut self, ignore: bool) -> Self {
        self.ignore_aio_config = Some(ignore);
        self
    }

    /// Sets [`LoadOptions::environment`].
    #[must_use]
    pub fn with_environment(mut self, environment: CliEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Builds the options.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn build(self) -> Result<LoadOptions> {
        let mut options = LoadOptions::default();

        if !self.skip_env {
            EnvironmentOverrides::apply_overrides(&mut options)?;
        }

        if let Some(allow) = self.allow_no_impl {
            options.allow_no_impl = allow;
        }
        if let Some(validate) = self.validate {
            options.validate = validate;
        }
        if let Some(absolute) = self.absolute_paths {
            options.absolute_paths = absolute;
        }
        if let Some(ignore) = self.ignore_aio_config {
            options.ignore_aio_config = ignore;
        }
        if let Some(environment) = self.environment {
            options.environment = environment;
        }

        Ok(options)
    }
}
