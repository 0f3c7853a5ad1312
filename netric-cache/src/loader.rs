//! Caller-supplied I/O.
//!
//! The cache never talks to the server itself. When an entry is missing or
//! stale it asks a loader for the raw payload and parses the result.

use netric_model::GroupingsKey;
use serde_json::Value;

/// Error returned by a loader. Its message is kept in [`crate::CacheError::Loader`].
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches a definition payload (`{obj_type, title, fields, views, forms, default_view}`).
pub trait DefinitionLoader {
    fn load_definition(&self, obj_type: &str) -> Result<Value, LoadError>;
}

impl<F> DefinitionLoader for F
where
    F: Fn(&str) -> Result<Value, LoadError>,
{
    fn load_definition(&self, obj_type: &str) -> Result<Value, LoadError> {
        self(obj_type)
    }
}

/// Fetches a groupings payload (`{obj_type, field_name, filter, groups}`).
pub trait GroupingsLoader {
    fn load_groupings(&self, key: &GroupingsKey) -> Result<Value, LoadError>;
}

impl<F> GroupingsLoader for F
where
    F: Fn(&GroupingsKey) -> Result<Value, LoadError>,
{
    fn load_groupings(&self, key: &GroupingsKey) -> Result<Value, LoadError> {
        self(key)
    }
}
