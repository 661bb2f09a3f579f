use crate::types::{Number, Ref, Value};
use std::collections::btree_map::{self, BTreeMap};

/// An unordered mapping of tag names to values.
///
/// Iteration is sorted by tag name so encoders produce deterministic output.
/// Equality does not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Dict {
    tags: BTreeMap<String, Value>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.tags.get(name)
    }

    /// `true` when the tag is present with a non-null value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn missing(&self, name: &str) -> bool {
        !self.has(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, val: impl Into<Value>) -> Option<Value> {
        self.tags.insert(name.into(), val.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.tags.remove(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.tags.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn id(&self) -> Option<&Ref> {
        match self.get("id") {
            Some(Value::Ref(r)) => Some(r),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_number(&self, name: &str) -> Option<&Number> {
        match self.get(name) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn get_ref(&self, name: &str) -> Option<&Ref> {
        match self.get(name) {
            Some(Value::Ref(r)) => Some(r),
            _ => None,
        }
    }

    /// Display text: `dis` tag, then the id's display string, then the id.
    pub fn dis(&self) -> Option<&str> {
        self.get_str("dis").or_else(|| self.id().map(Ref::display))
    }

    /// Applies `changes` in place: `Remove` values delete the tag, everything
    /// else overwrites it.
    pub fn merge(&mut self, changes: &Dict) {
        for (name, val) in changes {
            if matches!(val, Value::Remove) {
                self.tags.remove(name);
            } else {
                self.tags.insert(name.clone(), val.clone());
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Dict {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Dict {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Dict;
    use crate::types::{Ref, Value};

    #[test]
    fn equality_ignores_insertion_order() {
        let a: Dict = [("a", Value::Marker), ("b", Value::from(1.0))]
            .into_iter()
            .collect();
        let b: Dict = [("b", Value::from(1.0)), ("a", Value::Marker)]
            .into_iter()
            .collect();
        assert_eq!(a, b);

        let c: Dict = [("a", Value::Marker)].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn has_treats_null_as_missing() {
        let d: Dict = [("a", Value::Null), ("b", Value::Marker)].into_iter().collect();
        assert!(!d.has("a"));
        assert!(d.missing("a"));
        assert!(d.has("b"));
        assert!(d.missing("c"));
    }

    #[test]
    fn dis_falls_back_to_ref() {
        let mut d = Dict::new();
        d.insert("id", Ref::with_dis("a", "Alpha").unwrap());
        assert_eq!(d.dis(), Some("Alpha"));
        d.insert("dis", "Explicit");
        assert_eq!(d.dis(), Some("Explicit"));
    }

    #[test]
    fn merge_applies_remove() {
        let mut d: Dict = [("a", Value::Marker), ("b", Value::from("x"))]
            .into_iter()
            .collect();
        let changes: Dict = [("a", Value::Remove), ("c", Value::from(2.0))]
            .into_iter()
            .collect();
        d.merge(&changes);
        assert!(d.missing("a"));
        assert_eq!(d.get_str("b"), Some("x"));
        assert_eq!(d.get_number("c").map(|n| n.val), Some(2.0));
    }
}
