//! Definition cache.
//!
//! Definitions change rarely, so each one is kept for a fixed freshness
//! window and then fetched again on next use. A stale entry is never served.

use crate::clock::Clock;
use crate::error::{CacheError, CacheResult};
use crate::loader::DefinitionLoader;
use chrono::{DateTime, TimeDelta, Utc};
use netric_model::Definition;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct CachedDefinition {
    definition: Arc<Definition>,
    fetched_at: DateTime<Utc>,
}

pub struct DefinitionCache {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entries: HashMap<String, CachedDefinition>,
}

impl DefinitionCache {
    #[must_use]
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached definition if it is still fresh.
    #[must_use]
    pub fn get(&self, obj_type: &str) -> Option<Arc<Definition>> {
        let now = self.clock.now();
        self.entries
            .get(obj_type)
            .filter(|entry| self.fresh(entry, now))
            .map(|entry| Arc::clone(&entry.definition))
    }

    /// Whether the entry for `obj_type` would still be served at `at`.
    #[must_use]
    pub fn is_fresh_at(&self, obj_type: &str, at: DateTime<Utc>) -> bool {
        self.entries
            .get(obj_type)
            .is_some_and(|entry| self.fresh(entry, at))
    }

    fn fresh(&self, entry: &CachedDefinition, at: DateTime<Utc>) -> bool {
        at.signed_duration_since(entry.fetched_at) < self.ttl
    }

    /// Stores a definition, replacing any entry for its type.
    pub fn insert(&mut self, definition: Definition) -> Arc<Definition> {
        let definition = Arc::new(definition);
        self.entries.insert(
            definition.obj_type.clone(),
            CachedDefinition {
                definition: Arc::clone(&definition),
                fetched_at: self.clock.now(),
            },
        );
        definition
    }

    /// Parses and stores a definition payload.
    pub fn insert_data(&mut self, data: &Value) -> CacheResult<Arc<Definition>> {
        let definition = Definition::from_data(data)?;
        Ok(self.insert(definition))
    }

    /// Returns the fresh definition for `obj_type`, loading it when missing
    /// or stale.
    pub fn get_or_load(
        &mut self,
        obj_type: &str,
        loader: &dyn DefinitionLoader,
    ) -> CacheResult<Arc<Definition>> {
        if let Some(definition) = self.get(obj_type) {
            debug!(obj_type = %obj_type, "Definition cache hit");
            return Ok(definition);
        }

        let data = loader
            .load_definition(obj_type)
            .map_err(|e| CacheError::Loader(e.to_string()))?;
        let definition = Definition::from_data(&data)?;
        if definition.obj_type != obj_type {
            return Err(CacheError::ObjTypeMismatch {
                requested: obj_type.to_string(),
                received: definition.obj_type,
            });
        }

        info!(
            obj_type = %obj_type,
            fields = definition.get_fields().len(),
            revision = definition.revision,
            "Loaded definition"
        );
        Ok(self.insert(definition))
    }

    /// Drops the entry for `obj_type`. Returns whether one existed.
    pub fn invalidate(&mut self, obj_type: &str) -> bool {
        self.entries.remove(obj_type).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for DefinitionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}
