//! Lexical path normalization.
//!
//! Configuration paths are compared and emitted as forward-slash strings so
//! the include index and rewritten values look the same on every platform.
//! Nothing here touches the filesystem: `.` and `..` are resolved lexically
//! and symlinks are never followed.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expand tilde (~) to the home directory.
///
/// This function handles `~` and `~/path` but does not support `~user` syntax.
///
/// # Errors
///
/// Returns an error if:
/// - The path contains invalid UTF-8
/// - The home directory cannot be determined
/// - The path uses `~user` syntax (not supported)
///
/// # Examples
///
/// ```
/// use appconf::paths::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/project")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("project"));
///
/// let expanded = expand_tilde(Path::new("/absolute")).unwrap();
/// assert_eq!(expanded, Path::new("/absolute"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::Validation {
        field: path.display().to_string(),
        message: "Path contains invalid UTF-8".to_string(),
    })?;

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::Validation {
        field: path_str.to_string(),
        message: "Cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else if path_str.starts_with("~/") || path_str.starts_with("~\\") {
        Ok(home.join(&path_str[2..]))
    } else {
        Err(Error::Validation {
            field: path_str.to_string(),
            message: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Converts platform separators to forward slashes.
#[must_use]
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether a forward-slash path is absolute (`/x` or a drive letter `C:/x`).
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || (bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/')
}

/// Resolve `.` and `..` segments and collapse repeated separators.
///
/// `..` at the root of an absolute path is dropped. Leading `..` segments of
/// a relative path are kept. An empty relative result is `"."`.
///
/// # Examples
///
/// ```
/// use appconf::paths::normalize::lexical_normalize;
///
/// assert_eq!(lexical_normalize("/a/./b/../c"), "/a/c");
/// assert_eq!(lexical_normalize("src//dx/../web-src/"), "src/web-src");
/// assert_eq!(lexical_normalize("../shared/./x.yaml"), "../shared/x.yaml");
/// assert_eq!(lexical_normalize("./"), ".");
/// ```
#[must_use]
pub fn lexical_normalize(path: &str) -> String {
    let path = to_slash(path);
    let (prefix, rest) = split_root(&path);
    let absolute = !prefix.is_empty();

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            normal => segments.push(normal),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("{prefix}{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// The directory part of a forward-slash path: `""` for a bare file name,
/// `"/"` for a file at the filesystem root.
///
/// # Examples
///
/// ```
/// use appconf::paths::normalize::parent_dir;
///
/// assert_eq!(parent_dir("src/dx/ext.config.yaml"), "src/dx");
/// assert_eq!(parent_dir("app.config.yaml"), "");
/// assert_eq!(parent_dir("/app.config.yaml"), "/");
/// ```
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "",
    }
}

/// Join `relative` onto `base_dir` and normalize. Absolute `relative` values
/// ignore the base.
///
/// # Examples
///
/// ```
/// use appconf::paths::normalize::join;
///
/// assert_eq!(join("src/dx", "./actions"), "src/dx/actions");
/// assert_eq!(join("", "actions/"), "actions");
/// assert_eq!(join("src/dx", "/opt/actions"), "/opt/actions");
/// ```
#[must_use]
pub fn join(base_dir: &str, relative: &str) -> String {
    let relative = to_slash(relative);
    if is_absolute(&relative) || base_dir.is_empty() {
        lexical_normalize(&relative)
    } else {
        lexical_normalize(&format!("{base_dir}/{relative}"))
    }
}

/// Make a forward-slash path absolute against `working_dir`.
#[must_use]
pub fn absolutize(path: &str, working_dir: &Path) -> String {
    if is_absolute(&to_slash(path)) {
        lexical_normalize(path)
    } else {
        let cwd = to_slash(&working_dir.to_string_lossy());
        join(&lexical_normalize(&cwd), path)
    }
}

/// Express `path` relative to `base_dir`. Both are normalized first. When one
/// is absolute and the other is not, `path` is returned normalized.
///
/// # Examples
///
/// ```
/// use appconf::paths::normalize::relative_to;
///
/// assert_eq!(relative_to("app/myactions", "app"), "myactions");
/// assert_eq!(relative_to("shared/actions", "app"), "../shared/actions");
/// assert_eq!(relative_to("app", "app"), ".");
/// assert_eq!(relative_to("src/actions", ""), "src/actions");
/// ```
#[must_use]
pub fn relative_to(path: &str, base_dir: &str) -> String {
    let path = lexical_normalize(path);
    let base = if base_dir.is_empty() {
        ".".to_string()
    } else {
        lexical_normalize(base_dir)
    };

    if is_absolute(&path) != is_absolute(&base) {
        return path;
    }

    let path_segments = segments_of(&path);
    let base_segments = segments_of(&base);
    let common = path_segments
        .iter()
        .zip(&base_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; base_segments.len() - common];
    parts.extend(&path_segments[common..]);

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn split_root(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        path.split_at(3)
    } else if path.starts_with('/') {
        path.split_at(1)
    } else {
        ("", path)
    }
}

fn segments_of(path: &str) -> Vec<&str> {
    let (_, rest) = split_root(path);
    rest.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}
