//! Wildcard expansion of rule paths against live input.
//!
//! `users.*.email` against `{"users": [{..}, {..}]}` expands to `users.0.email`
//! and `users.1.email`. Along the way every array that a wildcard walks over is
//! recorded as an array placeholder path, so that empty arrays survive result
//! projection even though they produce no element paths.

use crate::error::Error;
use crate::path::{has_wildcard, join, PathCache, PathSegment};
use crate::resolve::step;
use crate::rule::{RuleRef, RuleSet};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Concrete paths produced by expanding one rule path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathExpansion {
    /// Concrete paths that exist in the input
    pub paths: Vec<String>,
    /// Paths of arrays a wildcard was applied to
    pub placeholders: Vec<String>,
}

/// Expand one parsed rule path against `input`.
///
/// A path without wildcards is returned unchanged and is not looked up; a
/// missing field must still reach its rules so `required` can fail. A wildcard
/// applied to anything but an array contributes nothing.
pub fn expand_path(raw: &str, segments: &[PathSegment], input: &Value) -> PathExpansion {
    if !has_wildcard(segments) {
        return PathExpansion {
            paths: vec![raw.to_string()],
            placeholders: Vec::new(),
        };
    }

    let mut expansion = PathExpansion::default();
    walk(segments, Some(input), String::new(), &mut expansion);
    expansion
}

fn walk(segments: &[PathSegment], node: Option<&Value>, prefix: String, out: &mut PathExpansion) {
    let Some((segment, rest)) = segments.split_first() else {
        out.paths.push(prefix);
        return;
    };

    if segment.is_wildcard {
        match node {
            Some(Value::Array(items)) => {
                if !prefix.is_empty() {
                    out.placeholders.push(prefix.clone());
                }
                for (index, item) in items.iter().enumerate() {
                    walk(rest, Some(item), join(&prefix, &index.to_string()), out);
                }
            }
            _ => {
                trace_trace!(path = %prefix, "wildcard over a non-array value, no paths");
            }
        }
        return;
    }

    // Missing keys keep descending as null so later plain segments still
    // produce a path; only a later wildcard cuts the branch.
    let next = node.and_then(|n| step(n, &segment.name));
    walk(rest, next, join(&prefix, &segment.name), out);
}

/// Result of expanding a whole rule set.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Concrete path to the rules that apply to it, in rule set order
    pub fields: IndexMap<String, Vec<RuleRef>>,
    /// Array placeholder paths
    pub placeholders: IndexSet<String>,
}

impl Expansion {
    /// Number of concrete paths to validate.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there is nothing to validate.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Expand every rule path in `rules` against `input`.
///
/// When two rule paths land on the same concrete path their rule lists are
/// concatenated in rule set order. Fails on the first empty rule path.
pub fn expand_rules(rules: &RuleSet, input: &Value, cache: &PathCache) -> Result<Expansion, Error> {
    let mut expansion = Expansion::default();

    for (raw, list) in rules.iter() {
        let segments = cache.get_or_parse(raw)?;
        let PathExpansion {
            paths,
            placeholders,
        } = expand_path(raw, &segments, input);

        for path in paths {
            expansion
                .fields
                .entry(path)
                .or_default()
                .extend(list.iter().cloned());
        }
        expansion.placeholders.extend(placeholders);
    }

    trace_debug!(
        rule_paths = rules.len(),
        fields = expansion.fields.len(),
        placeholders = expansion.placeholders.len(),
        "expanded rule paths"
    );
    Ok(expansion)
}
