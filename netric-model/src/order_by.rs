use netric_types::wire::{as_object, opt_string, pick};
use netric_types::{Error, Result};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::InvalidDirection(other.to_string())),
        }
    }
}

/// A single sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub field_name: String,
    pub direction: Direction,
}

impl OrderBy {
    #[must_use]
    pub fn new(field_name: impl Into<String>, direction: Direction) -> Self {
        Self {
            field_name: field_name.into(),
            direction,
        }
    }

    /// Serializes to `{field_name, direction}`.
    #[must_use]
    pub fn to_data(&self) -> Value {
        json!({
            "field_name": self.field_name,
            "direction": self.direction.as_str(),
        })
    }

    /// Parses the wire shape. A missing direction sorts ascending.
    pub fn from_data(data: &Value) -> Result<Self> {
        let map = as_object(data, "order by")?;

        let field_name = pick(map, &["field_name", "fieldName", "field"])
            .and_then(opt_string)
            .unwrap_or_default();

        let direction = match pick(map, &["direction", "order"]).and_then(Value::as_str) {
            Some(s) => s.parse()?,
            None => Direction::Asc,
        };

        Ok(Self {
            field_name,
            direction,
        })
    }
}
