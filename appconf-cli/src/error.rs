//! Errors surfaced by the `appconf` binary and the exit code for each.

use appconf::Error as LibError;
use std::fmt;

/// Anything that ends a command unsuccessfully.
#[derive(Debug)]
pub enum CliError {
    /// Resolution, validation or loading failed in the library.
    Library(LibError),

    /// Arguments clap accepted but that make no sense for this project.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// The result could not be rendered in the requested format.
    Output(String),

    /// The command ran but its check did not pass.
    SemanticFailure(String),
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// | code | meaning |
    /// |---|---|
    /// | 1 | schema or component validation failed |
    /// | 3 | an `$include` could not be resolved |
    /// | 4 | bad arguments |
    /// | 5 | a file could not be read |
    /// | 6 | any other failure |
    /// | 7 | an `APPCONF_*` option value is invalid |
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                e if e.is_validation_error() => 1,
                e if e.is_include_error() => 3,
                LibError::Io(_) | LibError::DocumentRead { .. } => 5,
                LibError::Validation { .. } => 7,
                _ => 6,
            },
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Output(_) => 6,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Output(msg) => write!(f, "Failed to render output: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
