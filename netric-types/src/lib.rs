//! Core value types for the netric entity model.
//!
//! This crate defines the small, schema-agnostic building blocks used by the
//! model and cache crates:
//! - The object reference codec (`[obj_type:id:name]` strings)
//! - Helpers for reading loosely typed JSON field values
//! - Normalization of legacy wire shapes at the deserialization boundary
//! - Date parsing and the short display formats used for entity timestamps
//!
//! Anything that knows about a particular object type (customers, tasks, ...)
//! belongs to the server-supplied definitions, not here.

mod objref;
mod timestamp;
mod value;
pub mod wire;

pub use objref::ObjectReference;
pub use timestamp::{format_short_date, format_time_of_day, parse_datetime};
pub use value::{display_value, is_empty_value, normalize_bool, value_key};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the entity model.
///
/// These are programmer-misuse errors: the model never performs I/O, so
/// nothing here describes a network or storage failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown condition operator: {0}")]
    InvalidOperator(String),

    #[error("unknown sort direction: {0}")]
    InvalidDirection(String),

    /// `load_data` was called without a data object.
    #[error("entity data is required")]
    MissingData,

    /// `set_value` was called on a field that holds multiple values.
    #[error("field {0} holds multiple values; use add_multi_value")]
    MultiValueField(String),

    /// A multi-value operation was called on a single-value field.
    #[error("field {0} does not hold multiple values")]
    NotMultiValueField(String),

    /// A definition-dependent operation ran before a definition was attached.
    #[error("no entity definition attached")]
    MissingDefinition,
}
