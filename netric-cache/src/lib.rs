//! Cache service for the netric entity model.
//!
//! Definitions and groupings are loaded once and shared by every entity and
//! collection built from them. [`ModelCache`] owns both caches and creates
//! entities and collections against cached definitions. Fetching is done by
//! caller-supplied loaders ([`DefinitionLoader`], [`GroupingsLoader`]); the
//! cache itself performs no I/O.

mod clock;
mod config;
mod definitions;
mod error;
mod groupings;
mod loader;
mod service;

pub use clock::{Clock, SystemClock};
pub use config::CacheConfig;
pub use definitions::DefinitionCache;
pub use error::{CacheError, CacheResult};
pub use groupings::GroupingsCache;
pub use loader::{DefinitionLoader, GroupingsLoader, LoadError};
pub use service::ModelCache;
