//! Source Adapter
//!
//! Normalizes whatever collection the caller binds (an ordered sequence, an
//! insertion-ordered map, or a plain record of fields) into the ordered
//! sequence the load controller slices batches out of.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// A caller-supplied collection.
///
/// Sources are replaced wholesale on reconfiguration, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Source<T> {
    /// Ordered sequence, shared without copying its elements.
    Sequence(Arc<[T]>),
    /// Insertion-ordered key → value map.
    Keyed(IndexMap<String, T>),
    /// Plain key-value record, fields already in key-iteration order.
    Record(Vec<(String, T)>),
}

impl<T> Source<T> {
    pub fn len(&self) -> usize {
        match self {
            Source::Sequence(items) => items.len(),
            Source::Keyed(map) => map.len(),
            Source::Record(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Source<T> {
    /// Normalize this source into an ordered sequence.
    pub fn normalize(&self) -> Arc<[T]> {
        normalize(Some(self))
    }
}

/// Normalize an optional source into an ordered sequence.
///
/// Sequences come back as the same allocation. Maps and records yield their
/// values in iteration order. An absent source yields an empty sequence.
pub fn normalize<T: Clone>(source: Option<&Source<T>>) -> Arc<[T]> {
    match source {
        None => Arc::from(Vec::<T>::new()),
        Some(Source::Sequence(items)) => Arc::clone(items),
        Some(Source::Keyed(map)) => map.values().cloned().collect(),
        Some(Source::Record(fields)) => fields.iter().map(|(_, value)| value.clone()).collect(),
    }
}

impl<T> From<Vec<T>> for Source<T> {
    fn from(items: Vec<T>) -> Self {
        Source::Sequence(Arc::from(items))
    }
}

impl<T> From<Arc<[T]>> for Source<T> {
    fn from(items: Arc<[T]>) -> Self {
        Source::Sequence(items)
    }
}

impl<T> From<IndexMap<String, T>> for Source<T> {
    fn from(map: IndexMap<String, T>) -> Self {
        Source::Keyed(map)
    }
}

impl<T> FromIterator<T> for Source<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Source::Sequence(iter.into_iter().collect())
    }
}

impl Source<Value> {
    /// Adapt a dynamic JSON document.
    ///
    /// Arrays become sequences. Objects become records enumerated the way a
    /// browser enumerates own keys: canonical array-index keys in ascending
    /// numeric order first, then every other key in insertion order.
    /// Scalars and `null` are not collections and yield `None`.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Source::Sequence(Arc::from(items))),
            Value::Object(map) => {
                let (mut fields, named): (Vec<_>, Vec<_>) = map
                    .into_iter()
                    .partition(|(key, _)| array_index(key).is_some());
                fields.sort_by_key(|(key, _)| array_index(key));
                fields.extend(named);
                Some(Source::Record(fields))
            }
            _ => None,
        }
    }
}

/// Parse a key as a canonical array index ("0", "1", ... without leading
/// zeros, below 2^32 - 1).
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sequence_is_shared_not_copied() {
        let items: Arc<[i32]> = Arc::from(vec![1, 2, 3]);
        let source = Source::Sequence(Arc::clone(&items));
        let normalized = source.normalize();
        assert!(Arc::ptr_eq(&items, &normalized));
    }

    #[test]
    fn keyed_map_yields_values_in_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("z".to_string(), 1);
        map.insert("a".to_string(), 2);
        map.insert("m".to_string(), 3);
        let normalized = Source::from(map).normalize();
        assert_eq!(&*normalized, &[1, 2, 3]);
    }

    #[test]
    fn absent_source_is_empty() {
        let normalized = normalize::<i32>(None);
        assert!(normalized.is_empty());
    }

    #[test]
    fn json_object_values_follow_key_order() {
        let source = Source::from_json(json!({"a": 1, "b": 2, "c": 3})).unwrap();
        assert_eq!(&*source.normalize(), &[json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn json_object_index_keys_come_first() {
        let source =
            Source::from_json(json!({"b": "b", "10": "ten", "2": "two", "a": "a"})).unwrap();
        let keys: Vec<_> = match &source {
            Source::Record(fields) => fields.iter().map(|(k, _)| k.as_str()).collect(),
            _ => panic!("expected record"),
        };
        assert_eq!(&keys[..2], &["2", "10"]);
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn json_scalars_are_not_sources() {
        assert!(Source::from_json(json!(null)).is_none());
        assert!(Source::from_json(json!(42)).is_none());
        assert!(Source::from_json(json!("text")).is_none());
    }

    #[test]
    fn array_index_rejects_non_canonical_keys() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("42"), Some(42));
        assert_eq!(array_index("007"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index(""), None);
    }
}
