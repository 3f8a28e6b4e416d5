//! Path matching logic.
//!
//! # Responsibilities
//! - Match a request path exactly
//! - Match a request path by prefix
//!
//! # Design Decisions
//! - Matching is case-sensitive and byte-based
//! - No regex or wildcards to guarantee O(n) matching
//! - Matchers see only the path, never headers or the query string

use std::fmt::Debug;

use crate::config::MatchKind;

/// Trait for matching request paths against a pattern.
pub trait Matcher: Send + Sync + Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;

    /// The pattern this matcher was built from.
    fn pattern(&self) -> &str;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }

    fn pattern(&self) -> &str {
        &self.path
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.as_bytes().starts_with(self.prefix.as_bytes())
    }

    fn pattern(&self) -> &str {
        &self.prefix
    }
}

/// Compile a matcher from its configured kind.
pub fn compile(kind: MatchKind, pattern: impl Into<String>) -> Box<dyn Matcher> {
    match kind {
        MatchKind::Exact => Box::new(ExactPathMatcher::new(pattern)),
        MatchKind::Prefix => Box::new(PathPrefixMatcher::new(pattern)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactPathMatcher::new("/api/users");

        assert!(matcher.matches("/api/users"));
        assert!(!matcher.matches("/api/users/"));
        assert!(!matcher.matches("/api/users/1"));
        assert!(!matcher.matches("/API/users")); // Case sensitive
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api/tours/");

        assert!(matcher.matches("/api/tours/"));
        assert!(matcher.matches("/api/tours/12/keypoints"));
        assert!(!matcher.matches("/api/tours"));
        assert!(!matcher.matches("/api/Tours/1"));
    }

    #[test]
    fn test_prefix_is_not_segment_aware() {
        let matcher = compile(MatchKind::Prefix, "/api/auth");

        assert!(matcher.matches("/api/authors"));
        assert_eq!(matcher.pattern(), "/api/auth");
    }
}
