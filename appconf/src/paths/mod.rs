//! Path handling for resolved configuration.
//!
//! [`normalize`] holds the lexical helpers shared by document ids and the
//! rewriter. [`PathRewriter`] re-anchors the path-valued fields listed in
//! [`PATH_FIELDS`] once includes have been spliced.

pub mod normalize;
mod rewriter;
mod rules;

pub use rewriter::PathRewriter;
pub use rules::{classify, KeyPattern, PathField, Segment, PATH_FIELDS};
