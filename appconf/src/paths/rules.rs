//! Which key paths hold filesystem paths.

use crate::tree::KeyPath;

/// The kind of path a matched field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathField {
    /// `web` given as a plain string.
    Web,
    /// `web.src`.
    WebSrc,
    /// The actions directory.
    Actions,
    /// The unit test directory.
    UnitTest,
    /// The end-to-end test directory.
    E2eTest,
    /// The build output directory.
    Dist,
    /// An action's `function` source file.
    ActionFunction,
    /// The source half of an action `include` pair.
    ActionIncludeSource,
}

/// Matches one or more key path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Exactly this key.
    Literal(&'static str),
    /// `application`, or `extensions` followed by one extension name.
    Component,
    /// Any single key.
    AnyName,
    /// Any single sequence index.
    AnyIndex,
}

/// A sequence of [`Segment`] matchers that must consume a whole key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPattern(&'static [Segment]);

impl KeyPattern {
    /// Creates a pattern.
    #[must_use]
    pub const fn new(segments: &'static [Segment]) -> Self {
        Self(segments)
    }

    /// Whether the pattern matches all of `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use appconf::paths::{KeyPattern, Segment};
    /// use appconf::tree::KeyPath;
    ///
    /// let pattern = KeyPattern::new(&[Segment::Component, Segment::Literal("actions")]);
    /// assert!(pattern.matches(&KeyPath::from(["application", "actions"])));
    /// assert!(pattern.matches(&KeyPath::from(["extensions", "dx/excshell/1", "actions"])));
    /// assert!(!pattern.matches(&KeyPath::from(["extensions", "actions"])));
    /// ```
    #[must_use]
    pub fn matches(&self, path: &KeyPath) -> bool {
        matches_from(self.0, path.segments())
    }
}

use Segment::{AnyIndex, AnyName, Component, Literal};

/// Every path-bearing field.
pub const PATH_FIELDS: &[(KeyPattern, PathField)] = &[
    (KeyPattern::new(&[Component, Literal("web")]), PathField::Web),
    (KeyPattern::new(&[Component, Literal("web"), Literal("src")]), PathField::WebSrc),
    (KeyPattern::new(&[Component, Literal("actions")]), PathField::Actions),
    (KeyPattern::new(&[Component, Literal("unitTest")]), PathField::UnitTest),
    (KeyPattern::new(&[Component, Literal("e2eTest")]), PathField::E2eTest),
    (KeyPattern::new(&[Component, Literal("dist")]), PathField::Dist),
    (
        KeyPattern::new(&[
            Component,
            Literal("runtimeManifest"),
            Literal("packages"),
            AnyName,
            Literal("actions"),
            AnyName,
            Literal("function"),
        ]),
        PathField::ActionFunction,
    ),
    (
        KeyPattern::new(&[
            Component,
            Literal("runtimeManifest"),
            Literal("packages"),
            AnyName,
            Literal("actions"),
            AnyName,
            Literal("include"),
            AnyIndex,
            Literal("0"),
        ]),
        PathField::ActionIncludeSource,
    ),
];

/// The path field `path` denotes, if any.
#[must_use]
pub fn classify(path: &KeyPath) -> Option<PathField> {
    PATH_FIELDS
        .iter()
        .find(|(pattern, _)| pattern.matches(path))
        .map(|(_, field)| *field)
}

fn matches_from(pattern: &[Segment], path: &[String]) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match (first, path) {
        (Literal(expected), [key, tail @ ..]) => key == expected && matches_from(rest, tail),
        (AnyName, [_, tail @ ..]) => matches_from(rest, tail),
        (AnyIndex, [key, tail @ ..]) => is_index(key) && matches_from(rest, tail),
        (Component, [key, tail @ ..]) if key == "application" => matches_from(rest, tail),
        (Component, [key, _, tail @ ..]) if key == "extensions" => matches_from(rest, tail),
        _ => false,
    }
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
