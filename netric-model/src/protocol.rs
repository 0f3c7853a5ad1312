//! Wire messages exchanged with the entity server.
//!
//! The model builds request bodies and consumes responses; sending them is
//! the caller's job.

use netric_types::value_key;
use netric_types::wire::lenient_u64;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response to an entity query: one page of raw records plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub entities: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_num: u64,
}

/// The ids named in a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeleteIds {
    One(String),
    Many(Vec<String>),
}

/// Body of an entity delete: `{obj_type, id}` or `{obj_type, id: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub obj_type: String,
    pub id: DeleteIds,
}

impl DeleteRequest {
    #[must_use]
    pub fn one(obj_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            obj_type: obj_type.into(),
            id: DeleteIds::One(id.into()),
        }
    }

    /// Builds a request for several ids; a single id is sent unwrapped.
    #[must_use]
    pub fn many(obj_type: impl Into<String>, mut ids: Vec<String>) -> Self {
        let id = if ids.len() == 1 {
            DeleteIds::One(ids.remove(0))
        } else {
            DeleteIds::Many(ids)
        };
        Self {
            obj_type: obj_type.into(),
            id,
        }
    }
}

/// Response to a delete: the ids that were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeleteResult(pub Vec<String>);

impl<'de> Deserialize<'de> for DeleteResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self(raw.iter().map(value_key).collect()))
    }
}

/// Identifies one groupings list: `{obj_type, field_name, filter}`.
///
/// The filter is stored with its keys sorted so that equal filters compare
/// and hash equal regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupingsKey {
    pub obj_type: String,
    pub field_name: String,
    filter: Vec<(String, String)>,
}

impl GroupingsKey {
    #[must_use]
    pub fn new(obj_type: &str, field_name: &str, filter: &Map<String, Value>) -> Self {
        let mut filter: Vec<(String, String)> = filter
            .iter()
            .map(|(k, v)| (k.clone(), value_key(v)))
            .collect();
        filter.sort();

        Self {
            obj_type: obj_type.to_string(),
            field_name: field_name.to_string(),
            filter,
        }
    }

    /// Returns the filter as a JSON object.
    #[must_use]
    pub fn filter(&self) -> Map<String, Value> {
        self.filter
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()
    }

    /// Request parameters for fetching or saving this list.
    #[must_use]
    pub fn to_data(&self) -> Value {
        serde_json::json!({
            "obj_type": self.obj_type,
            "field_name": self.field_name,
            "filter": self.filter(),
        })
    }
}
