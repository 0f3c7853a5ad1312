//! Entity records.
//!
//! An [`Entity`] is one record of a server-defined object type. Its shape is
//! entirely described by the shared [`Definition`]: values are accepted only
//! for declared fields, and the field type decides how a value is stored.
//!
//! The lifecycle is load, mutate locally, serialize with [`Entity::get_data`],
//! save. Every successful mutation marks the entity dirty; clearing the flag
//! after a save is the caller's job.

use crate::definition::Definition;
use crate::events::{EntityEvent, SubscriptionId, Subscribers};
use crate::field::{DefaultEvent, Field, FieldType};
use crate::members::Members;
use crate::recurrence::RecurrencePattern;
use chrono::{Local, NaiveDateTime};
use netric_types::wire::opt_id;
use netric_types::{
    Error, ObjectReference, Result, display_value, format_short_date, format_time_of_day,
    is_empty_value, normalize_bool, parse_datetime, value_key,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

const NAME_PRECEDENCE: &[&str] = &["name", "title", "subject"];
const SNIPPET_PRECEDENCE: &[&str] = &["notes", "description", "body"];

/// A display label for one value of a multi-value field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueLabel {
    pub key: String,
    pub value: String,
}

/// The cached human-readable label(s) of a field value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueName {
    #[default]
    None,
    /// Label of a single-value field.
    Label(String),
    /// Labels of a multi-value field, keyed by value.
    Labels(Vec<ValueLabel>),
}

impl ValueName {
    fn from_label(label: Option<String>) -> Self {
        label.map_or(Self::None, Self::Label)
    }
}

/// The stored state of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub value: Value,
    pub value_name: ValueName,
}

impl FieldValue {
    fn empty_multi() -> Self {
        Self {
            value: Value::Array(Vec::new()),
            value_name: ValueName::Labels(Vec::new()),
        }
    }

    fn push_multi(&mut self, value: Value, label: Option<String>) {
        self.remove_multi(&value);
        let key = value_key(&value);
        if let Value::Array(values) = &mut self.value {
            values.push(value);
        } else {
            self.value = Value::Array(vec![value]);
        }
        if let Some(label) = label {
            match &mut self.value_name {
                ValueName::Labels(labels) => labels.push(ValueLabel { key, value: label }),
                other => *other = ValueName::Labels(vec![ValueLabel { key, value: label }]),
            }
        }
    }

    fn remove_multi(&mut self, value: &Value) -> bool {
        let key = value_key(value);
        let removed = match &mut self.value {
            Value::Array(values) => {
                let before = values.len();
                values.retain(|v| value_key(v) != key);
                values.len() != before
            }
            _ => false,
        };
        if let ValueName::Labels(labels) = &mut self.value_name {
            labels.retain(|l| l.key != key);
        }
        removed
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    /// The record id; `None` until the entity has been saved.
    pub id: Option<String>,
    pub obj_type: String,
    def: Arc<Definition>,
    field_values: HashMap<String, FieldValue>,
    dirty: bool,
    recurrence_pattern: Option<RecurrencePattern>,
    members: BTreeMap<String, Members>,
    subscribers: Subscribers<EntityEvent>,
}

impl Entity {
    /// Creates an empty entity of the definition's type.
    #[must_use]
    pub fn new(def: Arc<Definition>) -> Self {
        Self {
            id: None,
            obj_type: def.obj_type.clone(),
            def,
            field_values: HashMap::new(),
            dirty: false,
            recurrence_pattern: None,
            members: BTreeMap::new(),
            subscribers: Subscribers::new(),
        }
    }

    /// Creates an entity and loads `data` into it.
    pub fn from_data(def: Arc<Definition>, data: &Value) -> Result<Self> {
        let mut entity = Self::new(def);
        entity.load_data(data)?;
        Ok(entity)
    }

    #[must_use]
    pub fn definition(&self) -> &Arc<Definition> {
        &self.def
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Sets the dirty flag, typically to clear it after a successful save.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&EntityEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Applies a raw record from the server.
    ///
    /// Only keys naming a declared field are read; `<field>_fval` carries the
    /// display label and `recurrence_pattern` is parsed separately. Emits a
    /// single [`EntityEvent::Load`] and leaves the dirty flag unchanged. On
    /// error the entity is left as it was.
    pub fn load_data(&mut self, data: &Value) -> Result<()> {
        let map = match data {
            Value::Null => return Err(Error::MissingData),
            Value::Object(map) => map,
            _ => {
                return Err(Error::InvalidData(
                    "entity data must be a JSON object".to_string(),
                ));
            }
        };

        let recurrence = map
            .get("recurrence_pattern")
            .map(RecurrencePattern::from_data)
            .transpose()?;

        if let Some(id) = map.get("id") {
            self.id = opt_id(id);
        }

        let def = Arc::clone(&self.def);
        for field in def.get_fields() {
            let Some(raw) = map.get(&field.name) else {
                continue;
            };
            let fval = map.get(&format!("{}_fval", field.name));

            if field.field_type.is_multi_value() {
                self.load_multi(field, raw, fval);
            } else {
                let label = fval.and_then(|f| single_label(f, raw));
                self.store_single(field, raw.clone(), label);
            }
        }

        if let Some(pattern) = recurrence {
            self.recurrence_pattern = pattern;
        }

        self.subscribers.emit(&EntityEvent::Load);
        Ok(())
    }

    fn load_multi(&mut self, field: &Field, raw: &Value, fval: Option<&Value>) {
        let values: Vec<Value> = match raw {
            Value::Null => Vec::new(),
            Value::Array(items) => items.clone(),
            scalar => vec![scalar.clone()],
        };
        let labels = fval.map(|f| normalize_labels(f, &values)).unwrap_or_default();

        let mut stored = FieldValue::empty_multi();
        for value in values {
            let key = value_key(&value);
            let label = labels.iter().find(|l| l.key == key).map(|l| l.value.clone());
            stored.push_multi(value, label);
        }
        self.field_values.insert(field.name.clone(), stored);
    }

    fn store_single(&mut self, field: &Field, value: Value, label: Option<String>) {
        let value = if field.field_type == FieldType::Bool {
            normalize_bool(value)
        } else {
            value
        };

        if field.name == "id" {
            self.id = opt_id(&value);
        }

        let stored = FieldValue {
            value,
            value_name: ValueName::from_label(label),
        };
        self.field_values.insert(field.name.clone(), stored);
    }

    // Returns the declared field for a setter, or None for the silent no-op cases.
    fn writable_field(&self, name: &str) -> Option<Arc<Definition>> {
        if name.is_empty() {
            return None;
        }
        if name.contains('.') {
            debug!(obj_type = %self.obj_type, field = %name, "Ignoring write to referenced field path");
            return None;
        }
        if self.def.get_field(name).is_none() {
            debug!(obj_type = %self.obj_type, field = %name, "Ignoring write to undeclared field");
            return None;
        }
        Some(Arc::clone(&self.def))
    }

    fn changed(&mut self, name: &str) {
        self.dirty = true;
        if self.subscribers.is_empty() {
            return;
        }
        if let Some(stored) = self.field_values.get(name) {
            self.subscribers.emit(&EntityEvent::Change {
                field_name: name.to_string(),
                value: stored.value.clone(),
                value_name: stored.value_name.clone(),
            });
        }
    }

    /// Sets a single-value field.
    ///
    /// Unknown fields and dotted reference paths are ignored. Multi-value
    /// fields must go through [`Entity::add_multi_value`].
    pub fn set_value(&mut self, name: &str, value: Value, value_name: Option<&str>) -> Result<()> {
        let Some(def) = self.writable_field(name) else {
            return Ok(());
        };
        let Some(field) = def.get_field(name) else {
            return Ok(());
        };
        if field.field_type.is_multi_value() {
            return Err(Error::MultiValueField(name.to_string()));
        }

        self.store_single(field, value, value_name.map(str::to_string));
        self.changed(name);
        Ok(())
    }

    /// Adds a value to a multi-value field, moving it to the end if present.
    pub fn add_multi_value(
        &mut self,
        name: &str,
        value: Value,
        value_name: Option<&str>,
    ) -> Result<()> {
        let Some(def) = self.writable_field(name) else {
            return Ok(());
        };
        let Some(field) = def.get_field(name) else {
            return Ok(());
        };
        if !field.field_type.is_multi_value() {
            return Err(Error::NotMultiValueField(name.to_string()));
        }

        self.field_values
            .entry(name.to_string())
            .or_insert_with(FieldValue::empty_multi)
            .push_multi(value, value_name.map(str::to_string));
        self.changed(name);
        Ok(())
    }

    /// Removes a value from a multi-value field. Returns whether it was present.
    pub fn rem_multi_value(&mut self, name: &str, value: &Value) -> bool {
        let Some(def) = self.writable_field(name) else {
            return false;
        };
        if !def.get_field(name).is_some_and(|f| f.field_type.is_multi_value()) {
            return false;
        }

        let removed = self
            .field_values
            .get_mut(name)
            .is_some_and(|stored| stored.remove_multi(value));
        if removed {
            self.changed(name);
        }
        removed
    }

    /// Returns the stored value; multi-value fields return an array.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.field_values.get(name).map(|f| &f.value)
    }

    /// Returns the stored value and its label(s).
    #[must_use]
    pub fn get_field_value(&self, name: &str) -> Option<&FieldValue> {
        self.field_values.get(name)
    }

    /// Returns the display label of a field.
    ///
    /// Without `key`, multi-value labels are joined with `", "`. With `key`,
    /// the label whose key matches is returned; a numeric key that matches no
    /// label is tried as a position in the label list.
    #[must_use]
    pub fn get_value_name(&self, name: &str, key: Option<&str>) -> Option<String> {
        match (&self.field_values.get(name)?.value_name, key) {
            (ValueName::None, _) => None,
            (ValueName::Label(label), _) => Some(label.clone()),
            (ValueName::Labels(labels), None) => Some(
                labels
                    .iter()
                    .map(|l| l.value.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            (ValueName::Labels(labels), Some(key)) => labels
                .iter()
                .find(|l| l.key == key)
                .or_else(|| key.parse::<usize>().ok().and_then(|i| labels.get(i)))
                .map(|l| l.value.clone()),
        }
    }

    fn has_value(&self, name: &str) -> bool {
        self.get_value(name).is_some_and(|v| !is_empty_value(v))
    }

    fn text_of(&self, name: &str) -> Option<String> {
        self.get_value(name)
            .filter(|v| !is_empty_value(v))
            .map(display_value)
    }

    /// Best-effort title: `name`, `title`, `subject`, `first_name last_name`,
    /// then the id.
    #[must_use]
    pub fn get_name(&self) -> String {
        if let Some(name) = NAME_PRECEDENCE.iter().find_map(|f| self.text_of(f)) {
            return name;
        }

        let first = self.text_of("first_name").unwrap_or_default();
        let last = self.text_of("last_name").unwrap_or_default();
        let full = format!("{first} {last}");
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }

        self.id.clone().unwrap_or_default()
    }

    /// Best-effort plain-text preview from `notes`, `description` or `body`.
    #[must_use]
    pub fn get_snippet(&self) -> String {
        SNIPPET_PRECEDENCE
            .iter()
            .find_map(|f| self.text_of(f))
            .map(|text| strip_tags(&text).trim().to_string())
            .unwrap_or_default()
    }

    /// Display time for lists, relative to the local clock.
    ///
    /// See [`Entity::get_time_relative_to`].
    #[must_use]
    pub fn get_time(&self, field: Option<&str>, compress: bool) -> String {
        self.get_time_relative_to(field, compress, Local::now().naive_local())
    }

    /// Display time of `field`, defaulting to `ts_updated` then `ts_entered`.
    ///
    /// With `compress`, a value falling on `now`'s date renders as a time of
    /// day for timestamp fields or `Today` for date fields. Anything else
    /// renders as `M/D/YYYY`.
    #[must_use]
    pub fn get_time_relative_to(
        &self,
        field: Option<&str>,
        compress: bool,
        now: NaiveDateTime,
    ) -> String {
        let name = match field {
            Some(name) => name,
            None if self.has_value("ts_updated") => "ts_updated",
            None => "ts_entered",
        };

        let Some(value) = self.get_value(name).filter(|v| !is_empty_value(v)) else {
            return String::new();
        };
        let Some(when) = parse_datetime(value) else {
            return display_value(value);
        };

        if compress && when.date() == now.date() {
            let is_date = self
                .def
                .get_field(name)
                .is_some_and(|f| f.field_type == FieldType::Date);
            return if is_date {
                "Today".to_string()
            } else {
                format_time_of_day(when.time())
            };
        }

        format_short_date(when.date())
    }

    /// Encodes an object reference; see [`ObjectReference`].
    #[must_use]
    pub fn encode_obj_ref(obj_type: &str, id: &str, name: Option<&str>) -> String {
        ObjectReference::encode(obj_type, id, name)
    }

    /// Decodes `[type:id:name]`, `[type:id|name]` or `[type:id]`.
    #[must_use]
    pub fn decode_obj_ref(value: &str) -> Option<ObjectReference> {
        ObjectReference::decode(value)
    }

    /// Fills empty fields with defaults.
    ///
    /// For `null` and `create` events each field's own default is applied.
    /// Then every field named in `default_data` that is still empty takes the
    /// supplied value (and `<field>_fval` label). Field defaults are never
    /// applied on `update`; the server owns those.
    pub fn set_default_values(
        &mut self,
        event: DefaultEvent,
        default_data: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let def = Arc::clone(&self.def);

        if event != DefaultEvent::Update {
            for field in def.get_fields() {
                if self.has_value(&field.name) {
                    continue;
                }
                if let Some(value) = field.get_default(event) {
                    self.apply_default(field, value.clone(), None)?;
                }
            }
        }

        let Some(data) = default_data else {
            return Ok(());
        };
        for (name, value) in data {
            let Some(field) = def.get_field(name) else {
                continue;
            };
            if self.has_value(name) {
                continue;
            }
            let label = data
                .get(&format!("{name}_fval"))
                .and_then(|f| single_label(f, value));
            self.apply_default(field, value.clone(), label)?;
        }

        Ok(())
    }

    fn apply_default(&mut self, field: &Field, value: Value, label: Option<String>) -> Result<()> {
        if !field.field_type.is_multi_value() {
            return self.set_value(&field.name, value, label.as_deref());
        }

        let values = match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            scalar => vec![scalar],
        };
        for value in values {
            self.add_multi_value(&field.name, value, label.as_deref())?;
        }
        Ok(())
    }

    #[must_use]
    pub fn recurrence_pattern(&self) -> Option<&RecurrencePattern> {
        self.recurrence_pattern.as_ref()
    }

    pub fn set_recurrence_pattern(&mut self, pattern: Option<RecurrencePattern>) {
        self.recurrence_pattern = pattern;
        self.dirty = true;
    }

    /// Members attached to `field`, if any were added.
    #[must_use]
    pub fn members(&self, field: &str) -> Option<&Members> {
        self.members.get(field)
    }

    /// Members attached to `field`, created on first use.
    pub fn members_mut(&mut self, field: &str) -> &mut Members {
        self.members.entry(field.to_string()).or_default()
    }

    /// Serializes the entity for saving.
    ///
    /// Emits `obj_type`, every declared field (null when unset) with its
    /// `<field>_fval` label when known, `recurrence_pattern` when the entity
    /// recurs, and `<field>_new` for members not yet saved.
    #[must_use]
    pub fn get_data(&self) -> Value {
        let mut data = Map::new();
        data.insert("obj_type".into(), Value::String(self.obj_type.clone()));
        if self.def.get_field("id").is_none() {
            data.insert(
                "id".into(),
                self.id.clone().map_or(Value::Null, Value::String),
            );
        }

        for field in self.def.get_fields() {
            let Some(stored) = self.field_values.get(&field.name) else {
                data.insert(field.name.clone(), Value::Null);
                continue;
            };
            data.insert(field.name.clone(), stored.value.clone());

            let fval = match &stored.value_name {
                ValueName::None => None,
                ValueName::Label(label) => Some(Value::String(label.clone())),
                ValueName::Labels(labels) if labels.is_empty() => None,
                ValueName::Labels(labels) => Some(Value::Object(
                    labels
                        .iter()
                        .map(|l| (l.key.clone(), Value::String(l.value.clone())))
                        .collect(),
                )),
            };
            if let Some(fval) = fval {
                data.insert(format!("{}_fval", field.name), fval);
            }
        }

        if let Some(pattern) = self.recurrence_pattern.as_ref().filter(|p| p.is_active()) {
            data.insert("recurrence_pattern".into(), pattern.to_data());
        }

        for (field, members) in &self.members {
            let new: Vec<Value> = members.new_members().map(|m| m.to_data()).collect();
            if !new.is_empty() {
                data.insert(format!("{field}_new"), Value::Array(new));
            }
        }

        Value::Object(data)
    }
}

/// Reads the label of a single value from its `_fval` entry, which is either
/// the label itself or a `{value: label}` map.
fn single_label(fval: &Value, value: &Value) -> Option<String> {
    match fval {
        Value::Null => None,
        Value::Object(map) => map
            .get(&value_key(value))
            .filter(|v| !v.is_null())
            .map(display_value),
        other => Some(display_value(other)),
    }
}

/// Normalizes the `_fval` shapes of a multi-value field into keyed labels.
///
/// Accepted: a `{key: label}` map, a list of `{key, value}` pairs, or a list
/// of plain labels parallel to `values` (falling back to the list position
/// as key).
fn normalize_labels(fval: &Value, values: &[Value]) -> Vec<ValueLabel> {
    match fval {
        Value::Object(map) => map
            .iter()
            .map(|(key, label)| ValueLabel {
                key: key.clone(),
                value: display_value(label),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(pair) if pair.contains_key("key") => ValueLabel {
                    key: pair.get("key").map(value_key).unwrap_or_default(),
                    value: pair.get("value").map(display_value).unwrap_or_default(),
                },
                label => ValueLabel {
                    key: values
                        .get(index)
                        .map_or_else(|| index.to_string(), value_key),
                    value: display_value(label),
                },
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Removes markup tags, leaving their text content.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}
