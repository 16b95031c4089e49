use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Count of pets grouped by status. Derived on every request, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(pub BTreeMap<String, i64>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, status: impl Into<String>) {
        *self.0.entry(status.into()).or_insert(0) += 1;
    }

    /// Number of pets with the given status
    pub fn get(&self, status: &str) -> i64 {
        self.0.get(status).copied().unwrap_or(0)
    }

    /// Number of distinct statuses present
    pub fn count(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for Inventory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for status in iter {
            inventory.increment(status);
        }
        inventory
    }
}
