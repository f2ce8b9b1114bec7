//! Order-insensitive comparison of interface collections.
//!
//! The controller and the declaration may list the same interfaces in a
//! different order. Both sides are sorted by interface name before any
//! comparison, so reordering alone never triggers an update.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::InterfaceConfig;

/// Sort an interface collection by name into an independent sequence.
///
/// The sort is stable, so duplicate names keep their relative order. Names
/// are expected to be unique; with duplicates the comparison below still
/// terminates but its answer depends on declaration order.
pub fn normalized(interfaces: &[InterfaceConfig]) -> Vec<&InterfaceConfig> {
    let mut sorted: Vec<&InterfaceConfig> = interfaces.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

/// Whether two collections describe the same interfaces, ignoring order.
///
/// Every field of every element takes part in the comparison.
pub fn equivalent(old: &[InterfaceConfig], new: &[InterfaceConfig]) -> bool {
    old.len() == new.len() && normalized(old) == normalized(new)
}

/// Per-name summary of how two collections differ. Display only; updates
/// always carry the whole new collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl InterfaceDelta {
    pub fn between(old: &[InterfaceConfig], new: &[InterfaceConfig]) -> Self {
        let old_by_name: BTreeMap<&str, &InterfaceConfig> =
            old.iter().map(|i| (i.name.as_str(), i)).collect();
        let new_by_name: BTreeMap<&str, &InterfaceConfig> =
            new.iter().map(|i| (i.name.as_str(), i)).collect();

        let mut delta = Self::default();
        for (name, iface) in &new_by_name {
            match old_by_name.get(name) {
                None => delta.added.push((*name).to_owned()),
                Some(prev) if prev != iface => delta.modified.push((*name).to_owned()),
                Some(_) => {}
            }
        }
        delta.removed = old_by_name
            .keys()
            .filter(|name| !new_by_name.contains_key(*name))
            .map(|name| (*name).to_owned())
            .collect();
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}
