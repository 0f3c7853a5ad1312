//! Groupings cache.
//!
//! Grouping lists are edited in place (groups added, renamed, removed), so the
//! cache hands out mutable access and keeps entries until invalidated.

use crate::error::{CacheError, CacheResult};
use crate::loader::GroupingsLoader;
use netric_model::{Groupings, GroupingsKey};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::info;

#[derive(Debug, Default)]
pub struct GroupingsCache {
    entries: HashMap<GroupingsKey, Groupings>,
}

impl GroupingsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &GroupingsKey) -> Option<&Groupings> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &GroupingsKey) -> Option<&mut Groupings> {
        self.entries.get_mut(key)
    }

    /// Stores a list under its own key, replacing any previous one.
    pub fn insert(&mut self, groupings: Groupings) -> GroupingsKey {
        let key = groupings.key();
        self.entries.insert(key.clone(), groupings);
        key
    }

    /// Returns the list for `key`, loading it on first use.
    ///
    /// The loaded list is stored under `key` whatever identity the payload
    /// claims; missing `obj_type`/`field_name`/`filter` are taken from the key.
    pub fn get_or_load(
        &mut self,
        key: &GroupingsKey,
        loader: &dyn GroupingsLoader,
    ) -> CacheResult<&mut Groupings> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let data = loader
                    .load_groupings(key)
                    .map_err(|e| CacheError::Loader(e.to_string()))?;
                let mut groupings = Groupings::from_data(&data)?;
                if groupings.obj_type.is_empty() {
                    groupings.obj_type.clone_from(&key.obj_type);
                }
                if groupings.field_name.is_empty() {
                    groupings.field_name.clone_from(&key.field_name);
                }
                if groupings.filter.is_empty() {
                    groupings.filter = key.filter();
                }

                info!(
                    obj_type = %key.obj_type,
                    field_name = %key.field_name,
                    groups = groupings.get_groups().len(),
                    "Loaded groupings"
                );
                Ok(entry.insert(groupings))
            }
        }
    }

    /// Drops the list for `key`. Returns whether one existed.
    pub fn invalidate(&mut self, key: &GroupingsKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
