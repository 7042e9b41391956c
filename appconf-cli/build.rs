//! Build script for appconf-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("appconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve and inspect application configuration")
        .long_about(
            "Command-line tool for resolving $include directives in app.config.yaml and inspecting the result",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("project-dir")
                .long("project-dir")
                .help("The project directory (defaults to the current directory)")
                .value_name("PATH")
                .global(true)
                .env("APPCONF_PROJECT_DIR"),
        )
        .subcommands(vec![
            Command::new("resolve")
                .about("Print the configuration with every $include resolved")
                .long_about("Resolve all $include directives and rewrite relative paths"),
            Command::new("index")
                .about("Print where every configuration key was defined")
                .long_about("Print the include index mapping merged keys to their defining file and key"),
            Command::new("show")
                .about("Load the whole project and print its components")
                .long_about("Merge legacy settings, validate and print every application and extension"),
            Command::new("validate")
                .about("Validate the configuration against the schema")
                .long_about("Resolve the configuration and report every schema violation"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("appconf.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
