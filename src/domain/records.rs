//! Record of mod files installed by a previous sync
//!
//! The record set scopes deletion: only files the updater installed itself
//! are ever removed from the mods directory.
//!
//! On disk the set lives in the flat settings table as sequential keys
//! `mod_0`, `mod_1`, … terminated by the first missing or empty value.

use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};

/// Key prefix for persisted record entries
pub const MOD_RECORD_PREFIX: &str = "mod_";

/// Set of mod file names installed by the updater
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModRecordSet {
    names: BTreeSet<String>,
}

impl ModRecordSet {
    /// Creates an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Read records from a flat key/value table
    ///
    /// Reading stops at the first index that is missing or holds an empty
    /// string, so anything after the sentinel is ignored.
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Self {
        let mut records = Self::new();
        for index in 0.. {
            match properties.get(&record_key(index)) {
                Some(name) if !name.is_empty() => {
                    records.insert(name.clone());
                }
                _ => break,
            }
        }
        records
    }

    /// Write records into a flat key/value table
    ///
    /// Every existing `mod_*` key is removed first, then the set is written
    /// as `mod_0..mod_{n-1}` followed by an empty `mod_n` sentinel.
    pub fn write_properties(&self, properties: &mut BTreeMap<String, String>) {
        properties.retain(|key, _| !is_record_key(key));
        for (index, name) in self.names.iter().enumerate() {
            properties.insert(record_key(index), name.clone());
        }
        properties.insert(record_key(self.names.len()), String::new());
    }

    /// Adds a name, returning false if it was already recorded
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Removes a name, returning true if it was recorded
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates names in sorted order
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.names.iter()
    }
}

fn record_key(index: usize) -> String {
    format!("{}{}", MOD_RECORD_PREFIX, index)
}

fn is_record_key(key: &str) -> bool {
    key.strip_prefix(MOD_RECORD_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

impl<S: Into<String>> FromIterator<S> for ModRecordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ModRecordSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
