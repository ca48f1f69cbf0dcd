//! Field-access paths into a [`Value`] tree
//!
//! A [`Path`] is an ordered list of keys, parsed once from a dot-separated
//! string such as `"deepKey.test"`. Bracketed indices are accepted too
//! (`"items[0].name"` parses to `["items", "0", "name"]`).
//!
//! Reads through a path never fail: a missing key, an out-of-range index or
//! a scalar in the middle of the path simply yields `None`. Writes create
//! missing (or `null`) intermediate containers as empty maps and reject any
//! attempt to descend through a leaf with [`ReducerError::PathConflict`].

use crate::error::ReducerError;
use crate::value::{Map, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Parsed field-access path
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: SmallVec<[String; 4]>,
}

impl Path {
    /// The empty path, addressing the whole value
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from an explicit list of keys
    ///
    /// Keys are taken verbatim, so they may contain dots or brackets.
    #[must_use]
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dot-separated path
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidPath`] for an empty string, an empty
    /// segment (`"a..b"`), an empty index (`"a[]"`) or unbalanced brackets.
    pub fn parse(text: &str) -> Result<Self, ReducerError> {
        let invalid = |reason: &str| ReducerError::InvalidPath {
            path: text.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut keys = SmallVec::new();
        for segment in text.split('.') {
            let (head, mut rest) = segment
                .find('[')
                .map_or((segment, ""), |at| segment.split_at(at));

            if head.is_empty() && rest.is_empty() {
                return Err(invalid("empty segment"));
            }
            if head.contains(']') {
                return Err(invalid("unbalanced brackets"));
            }
            if !head.is_empty() {
                keys.push(head.to_string());
            }

            while !rest.is_empty() {
                let Some((index, tail)) = rest.strip_prefix('[').and_then(|r| r.split_once(']'))
                else {
                    return Err(invalid("unbalanced brackets"));
                };
                if index.is_empty() {
                    return Err(invalid("empty index"));
                }
                if index.contains('[') {
                    return Err(invalid("unbalanced brackets"));
                }
                keys.push(index.to_string());
                rest = tail;
            }
        }

        Ok(Self { keys })
    }

    /// The keys, outermost first
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether this path addresses the whole value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A new path one level deeper
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.into());
        Self { keys }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("."))
    }
}

impl FromStr for Path {
    type Err = ReducerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = ReducerError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

/// Keys that print unambiguously in dotted form
fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']'])
}

/// Serialized as the dotted string when that parses back to the same keys,
/// otherwise as the list of keys.
impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_empty() && self.keys.iter().all(|key| is_plain_key(key)) {
            serializer.collect_str(self)
        } else {
            serializer.collect_seq(self.keys.iter())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPath {
    Text(String),
    Keys(Vec<String>),
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPath::deserialize(deserializer)? {
            RawPath::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
            RawPath::Keys(keys) => Ok(Self::from_keys(keys)),
        }
    }
}

fn child_of<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Map(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

impl Value {
    /// Read the sub-tree at `path`
    ///
    /// Returns `None` when any key along the way is missing.
    #[must_use]
    pub fn get_in(&self, path: &Path) -> Option<&Self> {
        path.keys().iter().try_fold(self, |node, key| child_of(node, key))
    }

    /// Replace the sub-tree at `path` with `value`
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::PathConflict`] if the path runs through a leaf.
    pub fn set_in(&self, path: &Path, value: Self) -> Result<Self, ReducerError> {
        self.update_in(path, |_| Ok(value))
    }

    /// Compute a new sub-tree at `path` from the current one
    ///
    /// `update` receives the current value at the path (or `None` if it
    /// does not exist yet). Containers are rebuilt only along the path; if
    /// `update` returns a value that is [`same`](Value::same) as the
    /// current one, `self` is returned by reference.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::PathConflict`] if the path runs through a
    /// leaf, or whatever error `update` itself returns.
    pub fn update_in<F>(&self, path: &Path, update: F) -> Result<Self, ReducerError>
    where
        F: FnOnce(Option<&Self>) -> Result<Self, ReducerError>,
    {
        update_at(Some(self), path.keys(), path, update)
    }
}

fn update_at<F>(
    node: Option<&Value>,
    keys: &[String],
    path: &Path,
    update: F,
) -> Result<Value, ReducerError>
where
    F: FnOnce(Option<&Value>) -> Result<Value, ReducerError>,
{
    let Some((key, rest)) = keys.split_first() else {
        return update(node);
    };

    match node {
        None | Some(Value::Null) => {
            let child = update_at(None, rest, path, update)?;
            let mut map = Map::new();
            map.insert(key.clone(), child);
            Ok(Value::from_map(map))
        },
        Some(current @ Value::Map(map)) => {
            let existing = map.get(key);
            let child = update_at(existing, rest, path, update)?;
            if existing.is_some_and(|e| e.same(&child)) {
                return Ok(current.clone());
            }
            let mut next = Map::clone(map);
            next.insert(key.clone(), child);
            Ok(Value::from_map(next))
        },
        Some(current @ Value::Array(items)) => {
            let index = key
                .parse::<usize>()
                .ok()
                .filter(|i| *i < items.len())
                .ok_or_else(|| conflict(path, key))?;
            let existing = items.get(index);
            let child = update_at(existing, rest, path, update)?;
            if existing.is_some_and(|e| e.same(&child)) {
                return Ok(current.clone());
            }
            let mut next = Vec::clone(items);
            next[index] = child;
            Ok(Value::from_vec(next))
        },
        Some(_) => Err(conflict(path, key)),
    }
}

fn conflict(path: &Path, key: &str) -> ReducerError {
    ReducerError::PathConflict {
        path: path.to_string(),
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[allow(clippy::expect_used)] // Panics: Test will fail if a fixture path is malformed
    fn path(text: &str) -> Path {
        Path::parse(text).expect("fixture path should parse")
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(path("deepKey.test").keys(), ["deepKey", "test"]);
        assert_eq!(path("single").keys(), ["single"]);
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(path("items[0].name").keys(), ["items", "0", "name"]);
        assert_eq!(path("grid[1][2]").keys(), ["grid", "1", "2"]);
        assert_eq!(path("[3]").keys(), ["3"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "a..b", ".a", "a.", "a[]", "a[0", "a[0]x", "a]b", "a]", "]", "a[[0]"] {
            assert!(
                matches!(Path::parse(text), Err(ReducerError::InvalidPath { .. })),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_display_joins_keys() {
        assert_eq!(path("a[0].b").to_string(), "a.0.b");
        assert_eq!(Path::from_keys(["x", "y"]).child("z").to_string(), "x.y.z");
        assert!(Path::root().is_empty());
    }

    #[test]
    fn test_get_in_tolerates_missing() {
        let state = Value::from(json!({"a": {"b": 1}, "list": [{"n": "x"}]}));
        assert_eq!(state.get_in(&path("a.b")), Some(&Value::from(1)));
        assert_eq!(state.get_in(&path("list.0.n")), Some(&Value::from("x")));
        assert!(state.get_in(&path("a.missing.deeper")).is_none());
        assert!(state.get_in(&path("a.b.c")).is_none());
        assert!(state.get_in(&path("list.7")).is_none());
        assert!(state.get_in(&Path::root()).is_some_and(|v| v.same(&state)));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if the write fails
    fn test_set_in_creates_missing_containers() {
        let state = Value::from(json!({"keep": {"x": 1}}));
        let next = state
            .set_in(&path("new.inner.leaf"), Value::from(5))
            .expect("write should succeed");

        assert_eq!(
            next,
            Value::from(json!({"keep": {"x": 1}, "new": {"inner": {"leaf": 5}}}))
        );
        assert!(next.get("keep").zip(state.get("keep")).is_some_and(|(a, b)| a.same(b)));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if the write fails
    fn test_set_in_replaces_null_intermediate() {
        let state = Value::from(json!({"a": null}));
        let next = state.set_in(&path("a.b"), Value::from(true)).expect("write should succeed");
        assert_eq!(next, Value::from(json!({"a": {"b": true}})));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if the write fails
    fn test_set_in_through_array_index() {
        let state = Value::from(json!({"list": [{"n": 1}, {"n": 2}]}));
        let next = state.set_in(&path("list[1].n"), Value::from(3)).expect("write should succeed");
        assert_eq!(next, Value::from(json!({"list": [{"n": 1}, {"n": 3}]})));

        let untouched = next.get_in(&path("list.0"));
        let original = state.get_in(&path("list.0"));
        assert!(untouched.zip(original).is_some_and(|(a, b)| a.same(b)));
    }

    #[test]
    fn test_set_in_conflicts_on_leaf() {
        let state = Value::from(json!({"name": "leaf", "list": [1]}));

        let err = state.set_in(&path("name.first"), Value::Null);
        assert!(matches!(
            err,
            Err(ReducerError::PathConflict { ref key, .. }) if key == "first"
        ));

        let err = state.set_in(&path("list.5"), Value::Null);
        assert!(matches!(err, Err(ReducerError::PathConflict { .. })));

        let err = state.set_in(&path("list.x"), Value::Null);
        assert!(matches!(err, Err(ReducerError::PathConflict { .. })));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if the write fails
    fn test_unchanged_write_keeps_reference() {
        let state = Value::from(json!({"a": {"b": 1}}));
        let same_leaf = Value::from(1);
        let next = state.set_in(&path("a.b"), same_leaf).expect("write should succeed");
        assert!(next.same(&state));
    }

    #[test]
    fn test_serde_as_string() {
        let parsed: Result<Path, _> = serde_json::from_str(r#""a.b[2]""#);
        assert!(parsed.is_ok_and(|p| p.keys() == ["a", "b", "2"]));

        let rejected: Result<Path, _> = serde_json::from_str(r#""a..b""#);
        assert!(rejected.is_err());

        let keys: Result<Path, _> = serde_json::from_str(r#"["user.name", "0"]"#);
        assert!(keys.is_ok_and(|p| p.keys() == ["user.name", "0"]));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if serialization fails
    fn test_serde_keeps_keys_with_delimiters() {
        for original in [
            Path::from_keys(["user.name"]),
            Path::from_keys(["list", "a[0]"]),
            Path::from_keys(["x", "", "y"]),
            Path::from_keys(["odd]key"]),
            Path::root(),
        ] {
            let json = serde_json::to_value(&original).expect("serialization should succeed");
            assert!(json.is_array(), "{original:?} should serialize as a key list");
            let back: Path = serde_json::from_value(json).expect("deserialization should succeed");
            assert_eq!(back, original);
        }

        let plain = serde_json::to_value(path("a.b[2]")).expect("serialization should succeed");
        assert_eq!(plain, json!("a.b.2"));
    }
}
