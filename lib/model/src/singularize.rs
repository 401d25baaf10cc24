use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Records which result paths must be collapsed from a list into a single value.
///
/// A path is the name of a result variable (i.e., the path segments joined by the delimiter of
/// the converter). Paths that are not contained in the record are plural.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SingularizeVariables(BTreeMap<String, bool>);

impl SingularizeVariables {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `path` as singular (`true`) or plural (`false`).
    pub fn insert(&mut self, path: impl Into<String>, singular: bool) {
        self.0.insert(path.into(), singular);
    }

    /// Returns whether the value at `path` must be singularized.
    pub fn is_singular(&self, path: &str) -> bool {
        self.0.get(path).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(path, singular)| (path.as_str(), *singular))
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for SingularizeVariables {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, bool); N]> for SingularizeVariables {
    fn from(value: [(K, bool); N]) -> Self {
        value.into_iter().collect()
    }
}
