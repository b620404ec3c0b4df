//! Rebuilding a pruned tree from validated paths.

use crate::path::{parse_index, SEPARATOR};
use crate::resolve::{resolve, step};
use serde_json::{Map, Value};

/// Paths that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPaths {
    /// Concrete field paths whose rules all passed
    pub fields: Vec<String>,
    /// Array placeholder paths from wildcard expansion
    pub placeholders: Vec<String>,
}

impl ValidatedPaths {
    /// Check if nothing was validated.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.placeholders.is_empty()
    }
}

/// Build a new object holding exactly the validated data from `input`.
///
/// Validated paths are split into array paths (the path names an array in
/// `input`) and leaf paths. Each leaf path is copied with its value (null if
/// missing), creating parent objects and arrays on the way. An array path,
/// whether ruled directly or recorded by wildcard expansion, only contributes
/// `[]` when the array is empty in `input`; non-empty arrays are rebuilt from
/// their validated element paths alone. Array slots skipped by every
/// validated path are filled with `{}`.
pub fn project(input: &Value, validated: &ValidatedPaths) -> Value {
    let mut out = Value::Object(Map::new());
    let mut arrays = Vec::new();

    for path in &validated.fields {
        match resolve(input, path) {
            Some(Value::Array(_)) => arrays.push(path),
            value => {
                let value = value.cloned().unwrap_or(Value::Null);
                write_path(&mut out, input, &segments(path), value);
            }
        }
    }

    for path in arrays.into_iter().chain(&validated.placeholders) {
        let is_empty_array = matches!(resolve(input, path), Some(Value::Array(items)) if items.is_empty());
        if is_empty_array && resolve(&out, path).is_none() {
            write_path(&mut out, input, &segments(path), Value::Array(Vec::new()));
        }
    }

    trace_debug!(
        fields = validated.fields.len(),
        placeholders = validated.placeholders.len(),
        "projected validated data"
    );
    out
}

fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

fn write_path(out: &mut Value, input: &Value, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut cursor = out;
    let mut source = Some(input);
    for (i, segment) in parents.iter().enumerate() {
        source = source.and_then(|s| step(s, segment));
        let Some(slot) = child_slot(cursor, segment) else {
            return;
        };
        if !slot.is_object() && !slot.is_array() {
            *slot = container_for(source, segments[i + 1]);
        }
        cursor = slot;
    }

    if let Some(slot) = child_slot(cursor, last) {
        *slot = value;
    }
}

/// Mutable slot for `segment` under `node`, created if missing.
fn child_slot<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => Some(map.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = parse_index(segment)?;
            while items.len() <= index {
                items.push(Value::Object(Map::new()));
            }
            Some(&mut items[index])
        }
        _ => None,
    }
}

/// Empty container mirroring the input's shape, or guessed from the next segment.
fn container_for(source: Option<&Value>, next: &str) -> Value {
    match source {
        Some(Value::Array(_)) => Value::Array(Vec::new()),
        Some(Value::Object(_)) => Value::Object(Map::new()),
        _ if parse_index(next).is_some() => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}
