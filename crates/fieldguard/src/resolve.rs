//! Lookup of concrete paths in a value tree.

use crate::path::{parse_index, SEPARATOR};
use serde_json::Value;

static NULL: Value = Value::Null;

/// Resolve a concrete dotted path against `root`.
///
/// Objects are indexed by key and arrays by decimal index. A missing key, an
/// out of range or non-numeric index, or a scalar in the middle of the path all
/// resolve to `None`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .try_fold(root, step)
}

/// Same as [`resolve`] but maps a missing value to `Value::Null`.
pub fn resolve_or_null<'a>(root: &'a Value, path: &str) -> &'a Value {
    resolve(root, path).unwrap_or(&NULL)
}

/// Descend one segment.
pub(crate) fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}
