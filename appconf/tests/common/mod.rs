//! Common test utilities for integration tests.
//!
//! This module provides a temporary project builder and the nested include
//! fixture shared by the integration tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A project directory on disk that is removed when dropped.
pub struct TestProject {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    /// Creates an empty project with a minimal `package.json`.
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        project.write("package.json", r#"{"name": "@org/sample-app", "version": "1.0.0"}"#)
    }

    /// The project directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `name`, creating parent directories.
    pub fn write(self, name: &str, contents: &str) -> Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
        self
    }

    /// Creates an empty directory.
    pub fn mkdir(self, name: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(name)).expect("Failed to create dir");
        self
    }

    /// The project root in `/`-separated form.
    pub fn root(&self) -> String {
        self.path().to_string_lossy().replace('\\', "/")
    }
}

/// A project with an extension reached through three levels of includes:
///
/// `app.config.yaml` -> `app.config2.yaml` -> `src/dx-excshell-1/ext.config.yaml`
/// -> `actions/pkg.manifest.yaml` -> `actions/sub/action.manifest.yaml`.
#[allow(dead_code)]
pub fn nested_include_project() -> TestProject {
    TestProject::new()
        .write("app.config.yaml", "extensions:\n  $include: app.config2.yaml\n")
        .write(
            "app.config2.yaml",
            "dx/excshell/1:\n  $include: src/dx-excshell-1/ext.config.yaml\n",
        )
        .write(
            "src/dx-excshell-1/ext.config.yaml",
            "\
operations:
  view:
    - type: web
      impl: index.html
actions: actions
web: web-src
runtimeManifest:
  $include: actions/pkg.manifest.yaml
",
        )
        .write(
            "src/dx-excshell-1/actions/pkg.manifest.yaml",
            "\
packages:
  my-exc-package:
    license: Apache-2.0
    actions:
      $include: sub/action.manifest.yaml
",
        )
        .write(
            "src/dx-excshell-1/actions/sub/action.manifest.yaml",
            "\
action:
  function: ../action.js
  web: 'yes'
  runtime: 'nodejs:14'
  include:
    - - ../somefile.txt
      - file.txt
",
        )
        .mkdir("src/dx-excshell-1/web-src")
}
