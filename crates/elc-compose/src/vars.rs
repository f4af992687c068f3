//! Order-preserving variable collections.
//!
//! Every variable mapping in elc — raw declarations as well as resolved
//! values — is a [`VarMap`]: resolution is declaration-order sensitive, so an
//! unordered map would make the output nondeterministic.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// An ordered sequence of `name = value` pairs with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarMap {
    entries: Vec<(String, String)>,
}

impl VarMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Binds `name` to `value` at the end of the sequence.
    ///
    /// A previous binding of `name` is dropped, so the entry moves to the
    /// position of its latest definition.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.retain(|(k, _)| *k != name);
        self.entries.push((name, value.into()));
    }

    /// Replaces the value of an existing binding without moving it.
    ///
    /// Returns `false` if `name` is not bound.
    pub fn replace(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders each binding as a `NAME=value` line.
    pub fn to_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|(k, v)| format!("{k}={v}"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VarMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for VarMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Collects a YAML mapping into `(key, value)` pairs in document order.
///
/// A null node yields no entries.
pub(crate) struct OrderedEntries<V>(PhantomData<V>);

impl<V> OrderedEntries<V> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedEntries<V> {
    type Value = Vec<(String, V)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(entries)
    }
}

impl<'de> Deserialize<'de> for VarMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = deserializer.deserialize_any(OrderedEntries::<serde_yaml::Value>::new())?;
        let mut vars = Self::new();
        for (name, value) in raw {
            let value = scalar_to_string(&name, value).map_err(de::Error::custom)?;
            vars.insert(name, value);
        }
        Ok(vars)
    }
}

fn scalar_to_string(name: &str, value: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value;
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(format!("variable {name} must be a scalar value"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_declaration_order() {
        let vars: VarMap = [("B", "1"), ("A", "2"), ("C", "3")].into_iter().collect();
        assert_eq!(vars.names().collect::<Vec<_>>(), ["B", "A", "C"]);
    }

    #[test]
    fn redefinition_moves_entry_to_the_end() {
        let mut vars: VarMap = [("A", "1"), ("B", "2")].into_iter().collect();
        vars.insert("A", "3");
        assert_eq!(vars.to_lines().collect::<Vec<_>>(), ["B=2", "A=3"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut vars: VarMap = [("A", "1"), ("B", "2")].into_iter().collect();
        assert!(vars.replace("A", "x"));
        assert!(!vars.replace("Z", "x"));
        assert_eq!(vars.to_lines().collect::<Vec<_>>(), ["A=x", "B=2"]);
    }

    #[test]
    fn deserializes_yaml_mapping_in_document_order() {
        let vars: VarMap =
            serde_yaml::from_str("Z: last\nUSER_ID: 1000\nFLAG: true\nEMPTY:\n").expect("parse");
        assert_eq!(
            vars.to_lines().collect::<Vec<_>>(),
            ["Z=last", "USER_ID=1000", "FLAG=true", "EMPTY="]
        );
    }

    #[test]
    fn rejects_nested_values() {
        let err = serde_yaml::from_str::<VarMap>("A: [1, 2]").unwrap_err();
        assert!(err.to_string().contains("must be a scalar"));
    }
}
