//! Dotted field paths and read/write access into JSON documents.
//!
//! A path such as `"user.address.zip"` names one location by successive
//! object keys. There is no array-index syntax: an array met during a read is
//! a dead end like any other non-object.

use std::fmt;

use serde_json::{Map, Value};

/// A parsed dot-notation field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Split `path` on `.` into its ordered key segments.
    ///
    /// Empty segments are kept as empty-string keys, so `"a..b"` has three
    /// segments and `""` has one.
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_owned(),
            segments: path.split('.').map(str::to_owned).collect(),
        }
    }

    /// Ordered object keys, outermost first. Never empty.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Result of reading a [`FieldPath`] from a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The final key exists. A JSON `null` stored there is still `Found`.
    Found(&'a Value),
    /// Some key on the way is missing, or a non-object was reached early.
    Absent,
}

/// Read the value at `path` inside `doc`.
pub fn get<'a>(doc: &'a Value, path: &FieldPath) -> Lookup<'a> {
    let mut current = doc;
    for key in path.segments() {
        match current.as_object().and_then(|map| map.get(key)) {
            Some(next) => current = next,
            None => return Lookup::Absent,
        }
    }
    Lookup::Found(current)
}

/// Write `value` at `path` inside `doc`, creating intermediate objects.
///
/// Any intermediate location (the root included) that is missing or holds a
/// non-object value is replaced by an empty object before descending. An
/// existing value at the final key is overwritten.
pub fn set(doc: &mut Value, path: &FieldPath, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        return;
    };

    let Some(mut current) = ensure_object(doc) else {
        return;
    };
    for key in parents {
        let child = current
            .entry(key.as_str())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(next) = ensure_object(child) else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}

/// Replace `value` with `{}` unless it already is an object, then borrow the map.
fn ensure_object(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}
