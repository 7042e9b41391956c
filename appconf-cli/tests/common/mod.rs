//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with a temporary project directory
//! - Command builder helpers with an isolated environment
//! - Project fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables the CLI reads. Cleared for every command so the
/// developer's shell does not leak into tests.
const APPCONF_VARS: [&str; 6] = [
    "APPCONF_ENV",
    "APPCONF_ABSOLUTE_PATHS",
    "APPCONF_VALIDATE",
    "APPCONF_LOG_MODE",
    "APPCONF_OUTPUT_FORMAT",
    "APPCONF_PROJECT_DIR",
];

/// Test environment with an isolated project directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the project directory
    pub project_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with a minimal `package.json`.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path().to_path_buf();
        let env = Self {
            temp_dir,
            project_dir,
        };
        env.write("package.json", r#"{"name": "cli-app", "version": "0.2.0"}"#);
        env
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("appconf").expect("Failed to find appconf binary");
        for var in APPCONF_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the project directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--project-dir").arg(&self.project_dir);
        cmd
    }

    /// Get the project path.
    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    /// The project path in `/`-separated form.
    pub fn root(&self) -> String {
        self.project_dir.to_string_lossy().replace('\\', "/")
    }

    /// Write a file relative to the project directory.
    pub fn write(&self, name: &str, contents: &str) {
        let path = self.project_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, contents).expect("Failed to write file");
    }

    /// Set up an extension included from `src/dx-excshell-1/ext.config.yaml`.
    pub fn with_extension(&self) {
        self.write(
            "app.config.yaml",
            "extensions:\n  dx/excshell/1:\n    $include: src/dx-excshell-1/ext.config.yaml\n",
        );
        self.write(
            "src/dx-excshell-1/ext.config.yaml",
            "\
operations:
  view:
    - type: web
      impl: index.html
actions: actions
runtimeManifest:
  packages:
    my-exc-package:
      actions:
        hello:
          function: actions/hello/index.js
",
        );
    }

    /// Run a command and return its stdout, asserting success.
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.command().args(args).output().expect("Failed to run appconf");
        assert!(
            output.status.success(),
            "appconf {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }
}
