//! Environment variable handling for load options.
//!
//! This module provides support for `APPCONF_*` environment variables that
//! override the built-in option defaults.

use std::env;

use crate::error::{Error, Result};
use crate::options::LoadOptions;

/// Selects the deployment environment (`prod` or `stage`).
pub const ENV_ENVIRONMENT: &str = "APPCONF_ENV";
/// Toggles absolute path rewriting.
pub const ENV_ABSOLUTE_PATHS: &str = "APPCONF_ABSOLUTE_PATHS";
/// Toggles schema validation.
pub const ENV_VALIDATE: &str = "APPCONF_VALIDATE";

/// Handles environment variable overrides for load options.
///
/// # Examples
///
/// ```no_run
/// use appconf::options::{EnvironmentOverrides, LoadOptions};
///
/// let mut options = LoadOptions::default();
/// EnvironmentOverrides::apply_overrides(&mut options).unwrap();
/// ```
pub struct EnvironmentOverrides;

impl EnvironmentOverrides {
    /// Apply environment variable overrides to `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable if a value is invalid.
    pub fn apply_overrides(options: &mut LoadOptions) -> Result<()> {
        if let Ok(val) = env::var(ENV_ENVIRONMENT) {
            options.environment = val.parse().map_err(|_| Error::Validation {
                field: ENV_ENVIRONMENT.into(),
                message: format!("Invalid environment: '{val}' (expected prod or stage)"),
            })?;
        }

        if let Ok(val) = env::var(ENV_ABSOLUTE_PATHS) {
            options.absolute_paths = Self::parse_bool(ENV_ABSOLUTE_PATHS, &val)?;
        }

        if let Ok(val) = env::var(ENV_VALIDATE) {
            options.validate = Self::parse_bool(ENV_VALIDATE, &val)?;
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes for true, false/0/no for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!("Invalid boolean value: '{s}' (expected true/false/1/0/yes/no)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CliEnvironment;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &'static str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old_value }
        }

        fn remove(key: &'static str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self { key, old_value }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(EnvironmentOverrides::parse_bool("test", "true").unwrap());
        assert!(EnvironmentOverrides::parse_bool("test", "YES").unwrap());
        assert!(EnvironmentOverrides::parse_bool("test", "1").unwrap());
        assert!(!EnvironmentOverrides::parse_bool("test", "False").unwrap());
        assert!(!EnvironmentOverrides::parse_bool("test", "no").unwrap());
        assert!(!EnvironmentOverrides::parse_bool("test", "0").unwrap());
    }

    #[test]
    fn test_parse_bool_invalid() {
        let err = EnvironmentOverrides::parse_bool("APPCONF_VALIDATE", "maybe").unwrap_err();
        assert!(err.to_string().contains("APPCONF_VALIDATE"));
    }

    #[test]
    #[serial]
    fn test_apply_overrides_no_env_vars() {
        let _env = EnvGuard::remove(ENV_ENVIRONMENT);
        let _abs = EnvGuard::remove(ENV_ABSOLUTE_PATHS);
        let _val = EnvGuard::remove(ENV_VALIDATE);

        let mut options = LoadOptions::default();
        EnvironmentOverrides::apply_overrides(&mut options).unwrap();
        assert_eq!(options, LoadOptions::default());
    }

    #[test]
    #[serial]
    fn test_apply_overrides_reads_all_variables() {
        let _env = EnvGuard::new(ENV_ENVIRONMENT, "stage");
        let _abs = EnvGuard::new(ENV_ABSOLUTE_PATHS, "false");
        let _val = EnvGuard::new(ENV_VALIDATE, "0");

        let mut options = LoadOptions::default();
        EnvironmentOverrides::apply_overrides(&mut options).unwrap();
        assert_eq!(options.environment, CliEnvironment::Stage);
        assert!(!options.absolute_paths);
        assert!(!options.validate);
    }

    #[test]
    #[serial]
    fn test_invalid_environment_names_variable() {
        let _env = EnvGuard::new(ENV_ENVIRONMENT, "qa");
        let mut options = LoadOptions::default();
        let err = EnvironmentOverrides::apply_overrides(&mut options).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == ENV_ENVIRONMENT));
    }
}
