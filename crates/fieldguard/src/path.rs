//! Dotted rule paths and the parse cache.
//!
//! A rule path such as `users.*.email` is a `.`-joined list of segments. A
//! segment whose text is exactly `*` is a wildcard and matches every index of
//! an array during expansion.

use crate::error::Error;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Wildcard segment text.
pub const WILDCARD: &str = "*";

/// Path separator.
pub const SEPARATOR: char = '.';

/// One segment of a parsed rule path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    pub is_wildcard: bool,
}

impl PathSegment {
    /// Create a segment. Wildcard status is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_wildcard = name == WILDCARD;
        Self { name, is_wildcard }
    }

    /// The segment as an array index, if it is one.
    pub fn as_index(&self) -> Option<usize> {
        parse_index(&self.name)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parse a dotted path into its segments.
///
/// Empty segments produced by leading, trailing or doubled dots are dropped, so
/// `a..b` parses as `[a, b]`. An empty string, or one made only of dots, is an
/// [`Error::InvalidPath`].
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, Error> {
    let segments: Vec<PathSegment> = path
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(PathSegment::new)
        .collect();

    if segments.is_empty() {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Whether any segment is a wildcard.
pub fn has_wildcard(segments: &[PathSegment]) -> bool {
    segments.iter().any(|s| s.is_wildcard)
}

/// Parse a path segment as an array index.
///
/// Only plain decimal digits count; `+1` or `-0` are not indices.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Append a segment to a dotted path.
pub(crate) fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        let mut out = String::with_capacity(prefix.len() + 1 + segment.len());
        out.push_str(prefix);
        out.push(SEPARATOR);
        out.push_str(segment);
        out
    }
}

static GLOBAL_CACHE: OnceLock<Arc<PathCache>> = OnceLock::new();

/// Memoizes parsed rule paths.
///
/// Parsing is a pure function of the path string, so concurrent inserts of the
/// same key are harmless and the cache can be cleared at any time. Callers that
/// already hold parsed segments keep them through the `Arc`.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: DashMap<String, Arc<[PathSegment]>>,
}

impl PathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache shared by validators built without their own.
    pub fn global() -> Arc<PathCache> {
        GLOBAL_CACHE
            .get_or_init(|| Arc::new(PathCache::new()))
            .clone()
    }

    /// Return the parsed segments for `path`, parsing and storing them on a miss.
    ///
    /// Invalid paths are not cached.
    pub fn get_or_parse(&self, path: &str) -> Result<Arc<[PathSegment]>, Error> {
        if let Some(segments) = self.entries.get(path) {
            return Ok(segments.clone());
        }

        let segments: Arc<[PathSegment]> = parse_path(path)?.into();
        self.entries.insert(path.to_string(), segments.clone());
        trace_trace!(path, segments = segments.len(), "parsed rule path");
        Ok(segments)
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(segments: &[PathSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn parses_simple_path() {
        let segments = parse_path("user.profile.name").unwrap();
        assert_eq!(names(&segments), vec!["user", "profile", "name"]);
        assert!(segments.iter().all(|s| !s.is_wildcard));
    }

    #[test]
    fn flags_wildcards() {
        let segments = parse_path("groups.*.users.*.name").unwrap();
        let flags: Vec<bool> = segments.iter().map(|s| s.is_wildcard).collect();
        assert_eq!(flags, vec![false, true, false, true, false]);
        assert!(has_wildcard(&segments));
    }

    #[test]
    fn only_exact_star_is_wildcard() {
        let segments = parse_path("a.**.b*").unwrap();
        assert!(!has_wildcard(&segments));
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(names(&parse_path("a..b").unwrap()), vec!["a", "b"]);
        assert_eq!(names(&parse_path(".a.b.").unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(matches!(parse_path(""), Err(Error::InvalidPath(p)) if p.is_empty()));
        assert!(matches!(parse_path("..."), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn index_parsing() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("x"), None);
        assert_eq!(parse_index(""), None);
    }

    #[test]
    fn join_paths() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a", "0"), "a.0");
    }

    #[test]
    fn cache_memoizes_and_clears() {
        let cache = PathCache::new();
        let first = cache.get_or_parse("users.*.email").unwrap();
        let second = cache.get_or_parse("users.*.email").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        // Segments captured before the clear are still usable.
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn cache_does_not_store_invalid_paths() {
        let cache = PathCache::new();
        assert!(cache.get_or_parse("").is_err());
        assert!(cache.is_empty());
    }
}
