use netric_types::wire::{lenient_flag, lenient_i64, lenient_id, lenient_string};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of a grouping (category) tree.
///
/// Groups are stored flat, linked by `parent_id`. `children` is only filled
/// in on the copies returned by `Groupings::get_groups_hierarch`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sort_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Group>>,
    #[serde(
        rename = "is_heiarch",
        alias = "heirarch",
        default,
        deserialize_with = "lenient_flag"
    )]
    pub heirarch: bool,
    #[serde(
        rename = "is_system",
        alias = "system",
        default,
        deserialize_with = "lenient_flag"
    )]
    pub system: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub filter_fields: Map<String, Value>,
}

impl Group {
    /// Creates an unsaved group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a saved group with an id and optional parent.
    #[must_use]
    pub fn with_id(id: impl Into<String>, parent_id: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            parent_id: parent_id.map(str::to_string),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses the wire shape.
    pub fn from_data(data: &Value) -> netric_types::Result<Self> {
        Ok(Group::deserialize(data)?)
    }

    /// Serializes to `{id, name, parent_id, color, children, sort_order, is_heiarch, is_system}`.
    #[must_use]
    pub fn to_data(&self) -> Value {
        let children = self
            .children
            .as_ref()
            .map(|children| children.iter().map(Group::to_data).collect::<Vec<_>>());

        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "parent_id": self.parent_id,
            "color": self.color,
            "children": children,
            "sort_order": self.sort_order,
            "is_heiarch": self.heirarch,
            "is_system": self.system,
            "filter_fields": self.filter_fields,
        })
    }
}
