//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `resolve`: Print the configuration with every `$include` resolved
//! - `index`: Print where every configuration key was defined
//! - `show`: Load the whole project and print its components
//! - `validate`: Check the configuration against the schema
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod index;
pub mod resolve;
pub mod show;
pub mod validate;

pub use completions::CompletionsCommand;
pub use index::IndexCommand;
pub use resolve::ResolveCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;
