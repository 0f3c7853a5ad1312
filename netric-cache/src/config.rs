use chrono::TimeDelta;
use netric_model::DEFAULT_LIMIT;

/// Cache service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a loaded definition is served before it is fetched again.
    pub definition_ttl: TimeDelta,
    /// Page size given to collections created by the service.
    pub default_collection_limit: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            definition_ttl: TimeDelta::minutes(5),
            default_collection_limit: DEFAULT_LIMIT,
        }
    }
}
