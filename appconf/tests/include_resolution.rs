//! Integration tests for `$include` resolution against real files.

mod common;

use std::path::Path;

use appconf::{coalesce, ConfigTree, DocumentId, Error, FsSource, IncludeResolver, KeyPath, LoadOptions};
use common::{nested_include_project, TestProject};

const EXT: &str = "extensions.dx/excshell/1";

fn relative_options() -> LoadOptions {
    LoadOptions {
        absolute_paths: false,
        ..LoadOptions::default()
    }
}

fn string_at<'t>(tree: &'t ConfigTree, dotted: &str) -> Option<&'t str> {
    tree.get_path(&KeyPath::from_dotted(dotted)).and_then(ConfigTree::as_str)
}

#[test]
fn test_nested_includes_index_every_level() {
    let project = nested_include_project();
    let source = FsSource::new(project.path());

    let resolved = IncludeResolver::new(&source)
        .resolve(&DocumentId::new("app.config.yaml"))
        .unwrap();

    let expect = |merged: &str, file: &str, key: &str| {
        let entry = resolved
            .index
            .get_dotted(merged)
            .unwrap_or_else(|| panic!("{merged} not indexed"));
        assert_eq!(entry.document.as_str(), file, "file of {merged}");
        assert_eq!(entry.key.to_string(), key, "key of {merged}");
    };

    expect("extensions", "app.config.yaml", "extensions");
    expect(EXT, "app.config2.yaml", "dx/excshell/1");
    expect(
        &format!("{EXT}.runtimeManifest"),
        "src/dx-excshell-1/ext.config.yaml",
        "runtimeManifest",
    );
    expect(
        &format!("{EXT}.runtimeManifest.packages.my-exc-package.actions"),
        "src/dx-excshell-1/actions/pkg.manifest.yaml",
        "packages.my-exc-package.actions",
    );
    expect(
        &format!("{EXT}.runtimeManifest.packages.my-exc-package.actions.action"),
        "src/dx-excshell-1/actions/sub/action.manifest.yaml",
        "action",
    );
    expect(
        &format!("{EXT}.runtimeManifest.packages.my-exc-package.actions.action.include.0.0"),
        "src/dx-excshell-1/actions/sub/action.manifest.yaml",
        "action.include.0.0",
    );

    assert!(resolved.index.iter().all(|(path, _)| path.last() != Some("$include")));
}

#[test]
fn test_nested_includes_relative_paths() {
    let project = nested_include_project();
    let source = FsSource::new(project.path());

    let resolved = coalesce(
        &source,
        &DocumentId::new("app.config.yaml"),
        project.path(),
        &relative_options(),
    )
    .unwrap();

    let action = format!("{EXT}.runtimeManifest.packages.my-exc-package.actions.action");
    let at = |suffix: &str| string_at(&resolved.tree, &format!("{action}.{suffix}")).map(str::to_string);

    assert_eq!(
        string_at(&resolved.tree, &format!("{EXT}.actions")),
        Some("src/dx-excshell-1/actions")
    );
    assert_eq!(
        string_at(&resolved.tree, &format!("{EXT}.web")),
        Some("src/dx-excshell-1/web-src")
    );
    assert_eq!(at("function").as_deref(), Some("src/dx-excshell-1/actions/action.js"));
    assert_eq!(at("include.0.0").as_deref(), Some("src/dx-excshell-1/actions/somefile.txt"));
    assert_eq!(at("include.0.1").as_deref(), Some("file.txt"));
    assert_eq!(at("runtime").as_deref(), Some("nodejs:14"));
}

#[test]
fn test_nested_includes_absolute_paths() {
    let project = nested_include_project();
    let source = FsSource::new(project.path());
    let root = project.root();

    let resolved = coalesce(
        &source,
        &DocumentId::new("app.config.yaml"),
        project.path(),
        &LoadOptions::default(),
    )
    .unwrap();

    assert_eq!(
        string_at(&resolved.tree, &format!("{EXT}.actions")),
        Some(format!("{root}/src/dx-excshell-1/actions").as_str())
    );
}

#[test]
fn test_app_not_in_project_root() {
    let project = TestProject::new()
        .write(
            "app/app.config.yaml",
            "application:\n  actions: myactions\n  runtimeManifest:\n    packages:\n      p:\n        actions:\n          a:\n            function: myactions/action.js\n",
        );
    let source = FsSource::new(project.path());

    let resolved = coalesce(
        &source,
        &DocumentId::new("app/app.config.yaml"),
        Path::new("/unused"),
        &relative_options(),
    )
    .unwrap();

    assert_eq!(string_at(&resolved.tree, "application.actions"), Some("myactions"));
    assert_eq!(
        string_at(&resolved.tree, "application.runtimeManifest.packages.p.actions.a.function"),
        Some("myactions/action.js")
    );
}

#[test]
fn test_cycle_through_files() {
    let project = TestProject::new()
        .write("app.config.yaml", "application:\n  $include: b.yaml\n")
        .write("b.yaml", "runtimeManifest:\n  $include: dir/c.yaml\n")
        .write("dir/c.yaml", "packages:\n  $include: ../app.config.yaml\n");
    let source = FsSource::new(project.path());

    let err = IncludeResolver::new(&source)
        .resolve(&DocumentId::new("app.config.yaml"))
        .unwrap_err();

    assert!(matches!(err, Error::IncludeCycle { .. }));
    assert!(err
        .to_string()
        .contains("'app.config.yaml,b.yaml,dir/c.yaml,app.config.yaml'"));
}

#[test]
fn test_missing_include_file() {
    let project = TestProject::new().write("app.config.yaml", "application:\n  $include: b.yaml\n");
    let source = FsSource::new(project.path());

    let err = IncludeResolver::new(&source)
        .resolve(&DocumentId::new("app.config.yaml"))
        .unwrap_err();

    assert!(err.is_include_error());
    assert!(err.to_string().contains("b.yaml"));
}

#[test]
fn test_include_of_non_mapping_file() {
    let project = TestProject::new()
        .write("app.config.yaml", "application:\n  $include: list.yaml\n")
        .write("list.yaml", "- a\n- b\n");
    let source = FsSource::new(project.path());

    let err = IncludeResolver::new(&source)
        .resolve(&DocumentId::new("app.config.yaml"))
        .unwrap_err();

    assert!(matches!(err, Error::InvalidIncludeTarget { .. }));
    assert!(err.to_string().contains("does not resolve to an object"));
}

#[test]
fn test_invalid_yaml_in_include() {
    let project = TestProject::new()
        .write("app.config.yaml", "application:\n  $include: broken.yaml\n")
        .write("broken.yaml", "key: [unclosed\n");
    let source = FsSource::new(project.path());

    let err = IncludeResolver::new(&source)
        .resolve(&DocumentId::new("app.config.yaml"))
        .unwrap_err();

    assert!(matches!(err, Error::DocumentParse { .. }));
}
