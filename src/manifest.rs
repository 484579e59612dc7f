//! Tolerant manifest tree with typed accessors
//!
//! The deployment manifest (`app.yaml`) is loosely structured user input: keys
//! may be missing, hold the wrong type, or the whole file may be absent or
//! malformed. This module wraps the parsed YAML tree behind accessors that
//! return a caller-supplied default on any absent or type-mismatched path, so
//! each extraction site in [`crate::config`] gets a static type without
//! spraying `match` arms over `serde_yaml::Value` everywhere.
//!
//! Only the anticipated failure modes (file not found, YAML parse error) are
//! swallowed into the empty manifest. Anything else, such as a permission
//! error, also falls back to empty but is logged at `warn` so it stays
//! visible.

use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// A parsed manifest tree, or a sub-tree of one.
///
/// An empty manifest behaves as a mapping with no keys, which makes the
/// "missing file means all defaults" behavior fall out of the accessors.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    root: Value,
}

impl Manifest {
    /// The empty manifest. Every lookup on it yields the default.
    pub fn empty() -> Self {
        Self { root: Value::Null }
    }

    /// Loads a manifest from `path`, falling back to the empty manifest when
    /// the file is missing or fails to parse.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no manifest file, using defaults");
                return Self::empty();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable manifest, using defaults");
                return Self::empty();
            }
        };

        match serde_yaml::from_str(&contents) {
            Ok(root) => Self { root },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "malformed manifest, using defaults");
                Self::empty()
            }
        }
    }

    /// Constructs a manifest directly from a YAML value. Used by sub-tree
    /// accessors and tests.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Looks up `key` in the root mapping. Explicit nulls count as absent,
    /// matching the manifest authoring convention where `build:` with no
    /// value means "not set".
    pub(crate) fn value(&self, key: &str) -> Option<&Value> {
        match &self.root {
            Value::Mapping(map) => match map.get(key) {
                Some(Value::Null) | None => None,
                Some(value) => Some(value),
            },
            _ => None,
        }
    }

    /// Returns the nested mapping under `key`, or the empty manifest when the
    /// key is absent or holds a non-mapping value.
    pub fn mapping(&self, key: &str) -> Manifest {
        match self.value(key) {
            Some(value @ Value::Mapping(_)) => Manifest::from_value(value.clone()),
            _ => Manifest::empty(),
        }
    }

    /// Returns the scalar under `key` rendered as a string. Numbers and
    /// booleans stringify; mappings and sequences yield `None`.
    pub fn string(&self, key: &str) -> Option<String> {
        self.value(key).and_then(scalar_to_string)
    }

    /// Like [`Manifest::string`] with a default for the absent case.
    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.string(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Returns the value under `key` coerced to a list of strings: a sequence
    /// element-wise, a lone scalar as a one-element list. Absent keys yield
    /// `None` so callers can distinguish "not set" from "set to empty".
    /// Non-scalar sequence elements are dropped.
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.value(key)? {
            Value::Sequence(seq) => Some(seq.iter().filter_map(scalar_to_string).collect()),
            value => scalar_to_string(value).map(|s| vec![s]),
        }
    }

    /// Returns the mapping under `key` with both keys and values rendered as
    /// strings. Absent or type-mismatched yields the empty map; entries whose
    /// key or value is not a scalar are dropped.
    pub fn string_map(&self, key: &str) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Some(Value::Mapping(map)) = self.value(key) {
            for (k, v) in map {
                if let (Some(k), Some(v)) = (scalar_to_string(k), scalar_to_string(v)) {
                    out.insert(k, v);
                }
            }
        }
        out
    }
}

/// Renders a scalar YAML value as a string. `None` for null, mappings and
/// sequences.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
