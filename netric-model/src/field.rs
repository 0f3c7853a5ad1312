use netric_types::wire::{lenient_flag, lenient_id};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Bool,
    Number,
    Integer,
    Date,
    Timestamp,
    Fkey,
    FkeyMulti,
    Object,
    ObjectMulti,
    Alias,
    Auto,
    /// Any type string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Returns true for types whose value is an ordered list of ids.
    #[must_use]
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::FkeyMulti | Self::ObjectMulti)
    }

    /// Returns true for types that point at other entities or groupings.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Self::Fkey | Self::FkeyMulti | Self::Object | Self::ObjectMulti
        )
    }

    /// Returns true for date and timestamp fields.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::Timestamp)
    }

    /// The wire spelling of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Fkey => "fkey",
            Self::FkeyMulti => "fkey_multi",
            Self::Object => "object",
            Self::ObjectMulti => "object_multi",
            Self::Alias => "alias",
            Self::Auto => "auto",
            Self::Unknown => "unknown",
        }
    }
}

/// The entity lifecycle event a field default is applied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultEvent {
    /// Whenever the field has no value.
    Null,
    /// When a new entity is created.
    Create,
    /// When an existing entity is saved. Only the server applies these.
    Update,
}

/// A default value declared on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefault {
    pub on: DefaultEvent,
    #[serde(default)]
    pub value: Value,
}

/// One attribute of an entity type, as described by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "netric_types::wire::lenient_string")]
    pub title: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub readonly: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub system: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub required: bool,
    #[serde(default, deserialize_with = "lenient_default")]
    pub default: Option<FieldDefault>,
    #[serde(default, deserialize_with = "lenient_options")]
    pub optional_values: BTreeMap<String, String>,
}

impl Field {
    /// Creates a plain field of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            field_type,
            ..Self::default()
        }
    }

    /// Sets the subtype (the referenced object type for `fkey`/`object` fields).
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Sets the default applied on `on`.
    #[must_use]
    pub fn with_default(mut self, on: DefaultEvent, value: Value) -> Self {
        self.default = Some(FieldDefault { on, value });
        self
    }

    /// Marks the field read-only.
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Parses a field from its wire shape.
    pub fn from_data(data: &Value) -> netric_types::Result<Self> {
        Ok(Field::deserialize(data)?)
    }

    /// Returns the default value that applies for `event`, if any.
    ///
    /// A `null` default also fills new entities, so it applies on `create`.
    #[must_use]
    pub fn get_default(&self, event: DefaultEvent) -> Option<&Value> {
        let default = self.default.as_ref()?;
        let applies = match (default.on, event) {
            (DefaultEvent::Null, DefaultEvent::Null | DefaultEvent::Create) => true,
            (on, event) => on == event,
        };
        applies.then_some(&default.value)
    }

    /// Returns a named attribute as JSON, for generic filtering.
    #[must_use]
    pub fn attribute(&self, attr: &str) -> Option<Value> {
        let value = match attr {
            "id" => self.id.clone().map_or(Value::Null, Value::String),
            "name" => Value::String(self.name.clone()),
            "title" => Value::String(self.title.clone()),
            "type" => Value::String(self.field_type.as_str().to_string()),
            "subtype" => self.subtype.clone().map_or(Value::Null, Value::String),
            "readonly" => Value::Bool(self.readonly),
            "system" => Value::Bool(self.system),
            "required" => Value::Bool(self.required),
            _ => return None,
        };
        Some(value)
    }
}

// The server sends `[]` for an empty default or option list.
fn lenient_default<'de, D>(deserializer: D) -> Result<Option<FieldDefault>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.get("on").is_none() {
        return Ok(None);
    }
    FieldDefault::deserialize(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

fn lenient_options<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => options_from_map(map),
        _ => BTreeMap::new(),
    })
}

fn options_from_map(map: Map<String, Value>) -> BTreeMap<String, String> {
    map.into_iter()
        .map(|(k, v)| (k, netric_types::display_value(&v)))
        .collect()
}
