use crate::error::AggregatorError;
use crate::state::entry::StateEntry;
use dashmap::DashMap;
use std::collections::HashSet;
use tracing::debug;

/// Latest state of every configured joint
///
/// The key set is fixed at construction. Each entry lives behind its DashMap
/// shard lock, so a reader never sees a half-written entry and writers to
/// different joints do not block each other. A snapshot is not atomic across
/// joints.
pub struct StateTable {
    /// Lock-free concurrent map for fast reads
    entries: DashMap<String, StateEntry>,

    /// Joint names in configuration order (snapshot iteration order)
    order: Vec<String>,
}

impl StateTable {
    /// Seed one zero-valued entry per joint name, preserving order
    ///
    /// Fails if `names` is empty or contains duplicates.
    pub fn initialize<I, S>(names: I) -> Result<Self, AggregatorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let order: Vec<String> = names.into_iter().map(Into::into).collect();

        if order.is_empty() {
            return Err(AggregatorError::Configuration(
                "no joints to aggregate".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(order.len());
        for name in &order {
            if !seen.insert(name.as_str()) {
                return Err(AggregatorError::Configuration(format!(
                    "joint '{}' configured more than once",
                    name
                )));
            }
        }

        let entries = DashMap::with_capacity(order.len());
        for name in &order {
            entries.insert(name.clone(), StateEntry::zeroed(name.clone()));
        }

        debug!(joints = ?order, "State table initialized");

        Ok(Self { entries, order })
    }

    /// Replace the entry for `entry.name`
    ///
    /// Unknown names are rejected without touching the table.
    pub fn update(&self, entry: StateEntry) -> Result<(), AggregatorError> {
        match self.entries.get_mut(&entry.name) {
            Some(mut slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(AggregatorError::UnknownProducerReport { name: entry.name }),
        }
    }

    /// Read every entry in configuration order
    pub fn snapshot(&self) -> Vec<StateEntry> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| e.value().clone()))
            .collect()
    }

    /// Get the current entry for one joint
    pub fn get(&self, name: &str) -> Option<StateEntry> {
        self.entries.get(name).map(|e| e.clone())
    }

    /// Joint names in configuration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
