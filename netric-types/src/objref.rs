//! Object reference strings.
//!
//! Field values may point at another entity inline using the form
//! `[obj_type:id]` or `[obj_type:id:name]`. Older servers wrote the name with
//! a pipe separator, `[obj_type:id|name]`, and those values are still found in
//! stored records, so decoding accepts all three shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A decoded pointer from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectReference {
    pub obj_type: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ObjectReference {
    /// Creates a reference, treating an empty name as no name.
    #[must_use]
    pub fn new(obj_type: impl Into<String>, id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            obj_type: obj_type.into(),
            id: id.into(),
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
        }
    }

    /// Encodes a reference as `[obj_type:id]` or `[obj_type:id:name]`.
    #[must_use]
    pub fn encode(obj_type: &str, id: &str, name: Option<&str>) -> String {
        match name {
            Some(name) if !name.is_empty() => format!("[{obj_type}:{id}:{name}]"),
            _ => format!("[{obj_type}:{id}]"),
        }
    }

    /// Decodes any of the supported reference shapes.
    ///
    /// Returns `None` when the value has no `obj_type:id` pair at all.
    #[must_use]
    pub fn decode(value: &str) -> Option<Self> {
        let stripped: String = value.chars().filter(|c| *c != '[' && *c != ']').collect();

        let mut parts = stripped.splitn(3, ':');
        let obj_type = parts.next()?;
        let id_part = parts.next()?;
        let name = parts.next();

        if obj_type.is_empty() || id_part.is_empty() {
            return None;
        }

        let (id, name) = match name {
            Some(name) => (id_part, Some(name)),
            // Legacy `type:id|name`
            None => match id_part.split_once('|') {
                Some((id, name)) => (id, Some(name)),
                None => (id_part, None),
            },
        };

        Some(Self::new(obj_type, id, name))
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::encode(&self.obj_type, &self.id, self.name.as_deref()))
    }
}

impl FromStr for ObjectReference {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
            .ok_or_else(|| crate::Error::InvalidData(format!("not an object reference: {s}")))
    }
}
