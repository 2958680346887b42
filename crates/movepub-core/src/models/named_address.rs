//! User-editable named-address list and its folded mapping.
//!
//! The registry is edited through value-to-value transitions so the
//! presentation layer can keep the previous list around if it wants to.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One row of the named-address editor. Both fields start empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedAddressEntry {
    pub name: String,
    pub address: String,
}

impl NamedAddressEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Entries with an empty name or address are not sent.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.address.is_empty()
    }
}

/// Which field of an entry an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryField {
    Name,
    Address,
}

/// Ordered list of named-address rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedAddressRegistry {
    entries: Vec<NamedAddressEntry>,
}

impl NamedAddressRegistry {
    /// Registry with a single blank row, ready for input.
    pub fn new() -> Self {
        Self {
            entries: vec![NamedAddressEntry::default()],
        }
    }

    pub fn from_entries(entries: Vec<NamedAddressEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[NamedAddressEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a blank row.
    #[must_use]
    pub fn with_blank_entry(mut self) -> Self {
        self.entries.push(NamedAddressEntry::default());
        self
    }

    /// Remove the row at `index`. Out-of-range indices leave the list as is.
    #[must_use]
    pub fn without_entry(mut self, index: usize) -> Self {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
        self
    }

    /// Set one field of the row at `index`.
    #[must_use]
    pub fn with_field(mut self, index: usize, field: EntryField, value: impl Into<String>) -> Self {
        if let Some(entry) = self.entries.get_mut(index) {
            match field {
                EntryField::Name => entry.name = value.into(),
                EntryField::Address => entry.address = value.into(),
            }
        }
        self
    }

    /// Add a blank-address row for every name not already present.
    ///
    /// A lone blank row is replaced rather than kept in front of the new rows.
    #[must_use]
    pub fn with_names<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        if self.entries.len() == 1 && self.entries[0] == NamedAddressEntry::default() {
            self.entries.clear();
        }
        for name in names {
            if !self.entries.iter().any(|e| e.name == name) {
                self.entries.push(NamedAddressEntry::new(name, ""));
            }
        }
        if self.entries.is_empty() {
            self.entries.push(NamedAddressEntry::default());
        }
        self
    }

    /// Fold the rows into the mapping sent to the compiler.
    ///
    /// Incomplete rows are dropped; a later row overrides an earlier row with
    /// the same name but keeps the earlier row's position.
    pub fn to_named_addresses(&self) -> NamedAddresses {
        self.entries
            .iter()
            .filter(|entry| entry.is_complete())
            .fold(NamedAddresses::default(), |mut map, entry| {
                map.insert(entry.name.clone(), entry.address.clone());
                map
            })
    }
}

impl Default for NamedAddressRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Name to address mapping that iterates in first-insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedAddresses {
    pairs: Vec<(String, String)>,
}

impl NamedAddresses {
    /// Insert or overwrite. Overwrites keep the original position.
    pub fn insert(&mut self, name: String, address: String) {
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = address,
            None => self.pairs.push((name, address)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, a)| (n.as_str(), a.as_str()))
    }
}

impl<N: Into<String>, A: Into<String>> FromIterator<(N, A)> for NamedAddresses {
    fn from_iter<I: IntoIterator<Item = (N, A)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (name, address) in iter {
            map.insert(name.into(), address.into());
        }
        map
    }
}

impl Serialize for NamedAddresses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (name, address) in &self.pairs {
            map.serialize_entry(name, address)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_blank_row() {
        let registry = NamedAddressRegistry::new();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0], NamedAddressEntry::default());
        assert!(registry.to_named_addresses().is_empty());
    }

    #[test]
    fn test_fold_drops_incomplete_and_last_wins() {
        let registry = NamedAddressRegistry::from_entries(vec![
            NamedAddressEntry::new("a", "1"),
            NamedAddressEntry::new("", "2"),
            NamedAddressEntry::new("a", "3"),
        ]);
        let map = registry.to_named_addresses();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("3"));
    }

    #[test]
    fn test_fold_keeps_first_insertion_order() {
        let registry = NamedAddressRegistry::from_entries(vec![
            NamedAddressEntry::new("std", "0x1"),
            NamedAddressEntry::new("pkg", ""),
            NamedAddressEntry::new("me", "0xcafe"),
            NamedAddressEntry::new("std", "0x2"),
        ]);
        let map = registry.to_named_addresses();
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("std", "0x2"), ("me", "0xcafe")]);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"std":"0x2","me":"0xcafe"}"#
        );
    }

    #[test]
    fn test_transitions() {
        let registry = NamedAddressRegistry::new()
            .with_field(0, EntryField::Name, "std")
            .with_field(0, EntryField::Address, "0x1")
            .with_blank_entry()
            .with_field(1, EntryField::Name, "me");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[0], NamedAddressEntry::new("std", "0x1"));
        assert_eq!(registry.entries()[1], NamedAddressEntry::new("me", ""));

        let removed = registry.clone().without_entry(0);
        assert_eq!(removed.entries(), &[NamedAddressEntry::new("me", "")]);

        // Out of range edits are ignored.
        assert_eq!(registry.clone().without_entry(9), registry);
        assert_eq!(
            registry.clone().with_field(5, EntryField::Name, "x"),
            registry
        );
    }

    #[test]
    fn test_with_names_replaces_lone_blank_row() {
        let registry = NamedAddressRegistry::new().with_names(["hello", "hello", "other"]);
        assert_eq!(
            registry.entries(),
            &[
                NamedAddressEntry::new("hello", ""),
                NamedAddressEntry::new("other", "")
            ]
        );

        let kept = NamedAddressRegistry::from_entries(vec![NamedAddressEntry::new("hello", "0x1")])
            .with_names(["hello", "other"]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.entries()[0].address, "0x1");

        let empty = NamedAddressRegistry::new().with_names(std::iter::empty());
        assert_eq!(empty, NamedAddressRegistry::new());
    }

    #[test]
    fn test_named_addresses_from_iter() {
        let map: NamedAddresses = [("std", "0x1"), ("std", "0x3")].into_iter().collect();
        assert_eq!(map.get("std"), Some("0x3"));
        assert_eq!(map.get("missing"), None);
    }
}
