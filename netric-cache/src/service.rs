use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::definitions::DefinitionCache;
use crate::error::CacheResult;
use crate::groupings::GroupingsCache;
use crate::loader::DefinitionLoader;
use netric_model::{Collection, DefaultEvent, Entity};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The model's shared state: definitions and groupings, plus factories for
/// entities and collections bound to cached definitions.
///
/// Build one per session and pass it by reference.
#[derive(Debug)]
pub struct ModelCache {
    config: CacheConfig,
    definitions: DefinitionCache,
    groupings: GroupingsCache,
}

impl ModelCache {
    /// Creates a cache on the wall clock.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            definitions: DefinitionCache::new(config.definition_ttl, clock),
            groupings: GroupingsCache::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[must_use]
    pub fn definitions(&self) -> &DefinitionCache {
        &self.definitions
    }

    pub fn definitions_mut(&mut self) -> &mut DefinitionCache {
        &mut self.definitions
    }

    #[must_use]
    pub fn groupings(&self) -> &GroupingsCache {
        &self.groupings
    }

    pub fn groupings_mut(&mut self) -> &mut GroupingsCache {
        &mut self.groupings
    }

    /// Creates an entity of `obj_type`.
    ///
    /// With `data` the record is loaded as-is. Without it the entity is new:
    /// field defaults for the `create` event are applied.
    pub fn create_entity(
        &mut self,
        obj_type: &str,
        data: Option<&Value>,
        loader: &dyn DefinitionLoader,
    ) -> CacheResult<Entity> {
        let definition = self.definitions.get_or_load(obj_type, loader)?;

        let entity = match data {
            Some(data) => Entity::from_data(definition, data)?,
            None => {
                let mut entity = Entity::new(definition);
                entity.set_default_values(DefaultEvent::Create, None)?;
                entity
            }
        };
        debug!(obj_type = %obj_type, id = ?entity.id, "Created entity");
        Ok(entity)
    }

    /// Creates an empty collection of `obj_type` using the configured page size.
    pub fn create_collection(
        &mut self,
        obj_type: &str,
        loader: &dyn DefinitionLoader,
    ) -> CacheResult<Collection> {
        let definition = self.definitions.get_or_load(obj_type, loader)?;
        let mut collection = Collection::with_definition(definition);
        collection.set_limit(self.config.default_collection_limit);
        Ok(collection)
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
