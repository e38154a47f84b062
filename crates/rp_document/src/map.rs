use alloc::string::String;
use alloc::vec::{self, Vec};
use core::fmt;
use core::hash::BuildHasher;

use rp_utils::hash::{FixedHashState, HashTable};

use crate::Value;

// -----------------------------------------------------------------------------
// Map

/// An insertion-ordered map from string keys to [`Value`]s.
///
/// Keys are unique; inserting an existing key replaces the value in place and
/// keeps its position. Rendered documents therefore list keys in descriptor
/// order.
///
/// Equality ignores order: two maps are equal when they hold the same
/// key/value pairs.
///
/// Entries are stored in order and indexed by a [`HashTable`] of positions,
/// so lookups and inserts do not scan. Removal shifts later entries.
///
/// # Examples
///
/// ```
/// use rp_document::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("name", "Nofx");
/// map.insert("label", "NOFX");
/// map.insert("name", "Bad Religion");
///
/// let keys: Vec<&str> = map.keys().collect();
/// assert_eq!(keys, ["name", "label"]);
/// assert_eq!(map.get("name"), Some(&Value::from("Bad Religion")));
/// ```
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(String, Value)>,
    index: HashTable<usize>,
}

#[inline]
fn hash_key(key: &str) -> u64 {
    FixedHashState.hash_one(key)
}

impl Map {
    /// Creates an empty `Map`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashTable::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn position(&self, key: &str) -> Option<usize> {
        let entries = &self.entries;
        self.index
            .find(hash_key(key), |&i| entries[i].0 == key)
            .copied()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.position(key) {
            Some(index) => Some(&mut self.entries[index].1),
            None => None,
        }
    }

    /// Inserts a key/value pair, returning the replaced value if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if let Some(index) = self.position(&key) {
            return Some(core::mem::replace(&mut self.entries[index].1, value));
        }

        let Self { entries, index } = self;
        index.insert_unique(hash_key(&key), entries.len(), |&i| hash_key(&entries[i].0));
        entries.push((key, value));
        None
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let Self { entries, index } = self;
        let found = index
            .find_entry(hash_key(key), |&i| entries[i].0 == key)
            .ok()?;
        let (removed, _) = found.remove();

        for position in index.iter_mut() {
            if *position > removed {
                *position -= 1;
            }
        }
        Some(entries.remove(removed).1)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Map {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Map {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::Map;
    use crate::Value;

    #[test]
    fn replace_keeps_position() {
        let mut map = Map::from([("a", 1), ("b", 2)]);
        assert_eq!(map.insert("a", 3), Some(Value::Int(1)));
        assert_eq!(map.keys().collect::<alloc::vec::Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn equality_ignores_order() {
        let left = Map::from([("a", 1), ("b", 2)]);
        let right = Map::from([("b", 2), ("a", 1)]);
        assert_eq!(left, right);
        assert_ne!(left, Map::from([("a", 1)]));
    }

    #[test]
    fn remove_preserves_order() {
        let mut map = Map::from([("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(map.remove("b"), Some(Value::Int(2)));
        assert_eq!(map.remove("b"), None);
        assert_eq!(map.keys().collect::<alloc::vec::Vec<_>>(), ["a", "c"]);
        assert_eq!(map.get("c"), Some(&Value::Int(3)));

        map.insert("b", 4);
        assert_eq!(map.keys().collect::<alloc::vec::Vec<_>>(), ["a", "c", "b"]);
        assert_eq!(map.get("b"), Some(&Value::Int(4)));
    }

    #[test]
    fn many_keys_stay_addressable() {
        let mut map = Map::new();
        for i in 0..20_000 {
            map.insert(format!("key{i}"), i);
        }
        assert_eq!(map.len(), 20_000);
        assert_eq!(map.get("key0"), Some(&Value::Int(0)));
        assert_eq!(map.get("key19999"), Some(&Value::Int(19_999)));
        assert!(!map.contains_key("key20000"));

        assert_eq!(map.remove("key10"), Some(Value::Int(10)));
        assert_eq!(map.get("key11"), Some(&Value::Int(11)));
        assert_eq!(map.keys().nth(10), Some("key11"));
    }
}
