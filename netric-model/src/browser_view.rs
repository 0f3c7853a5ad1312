//! Saved list configurations.
//!
//! A [`BrowserView`] names a filter, sort order and column set for browsing
//! entities of one type. Views come from the definition payload (system
//! views) or are saved by users.

use crate::condition::Where;
use crate::order_by::OrderBy;
use netric_types::Result;
use netric_types::wire::{as_object, flag, opt_id, opt_string, pick};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowserView {
    pub id: Option<String>,
    pub obj_type: String,
    pub name: String,
    pub description: String,
    pub system: bool,
    pub default: bool,
    pub user_id: Option<String>,
    pub team_id: Option<String>,
    pub report_id: Option<String>,
    pub scope: Option<String>,
    pub filter_key: Option<String>,
    pub conditions: Vec<Where>,
    pub order_by: Vec<OrderBy>,
    pub table_columns: Vec<String>,
}

impl BrowserView {
    /// Creates an empty, unsaved view for `obj_type`.
    #[must_use]
    pub fn new(obj_type: impl Into<String>) -> Self {
        Self {
            obj_type: obj_type.into(),
            ..Self::default()
        }
    }

    /// Builds a view from its wire shape.
    pub fn from_value(data: &Value) -> Result<Self> {
        let mut view = Self::default();
        view.from_data(data)?;
        Ok(view)
    }

    /// Merges a wire payload into this view.
    ///
    /// Each property is updated only when its key is present, so repeated
    /// calls compose. `conditions`, `order_by` and `table_columns` are the
    /// exception: when present they replace the whole list.
    pub fn from_data(&mut self, data: &Value) -> Result<()> {
        let map = as_object(data, "browser view")?;

        if let Some(v) = map.get("id") {
            self.id = opt_id(v);
        }
        if let Some(v) = map.get("obj_type") {
            self.obj_type = opt_string(v).unwrap_or_default();
        }
        if let Some(v) = map.get("name") {
            self.name = opt_string(v).unwrap_or_default();
        }
        if let Some(v) = map.get("description") {
            self.description = opt_string(v).unwrap_or_default();
        }
        if let Some(v) = pick(map, &["system", "f_system"]) {
            self.system = flag(v);
        }
        if let Some(v) = pick(map, &["default", "f_default"]) {
            self.default = flag(v);
        }
        if let Some(v) = map.get("user_id") {
            self.user_id = opt_id(v);
        }
        if let Some(v) = map.get("team_id") {
            self.team_id = opt_id(v);
        }
        if let Some(v) = map.get("report_id") {
            self.report_id = opt_id(v);
        }
        if let Some(v) = map.get("scope") {
            self.scope = opt_string(v);
        }
        if let Some(v) = map.get("filter_key") {
            self.filter_key = opt_string(v);
        }

        if let Some(v) = map.get("conditions") {
            self.conditions = list(v)
                .iter()
                .map(Where::from_data)
                .collect::<Result<_>>()?;
        }
        if let Some(v) = pick(map, &["order_by", "sort_order"]) {
            self.order_by = list(v)
                .iter()
                .map(OrderBy::from_data)
                .collect::<Result<_>>()?;
        }
        if let Some(v) = map.get("table_columns") {
            self.table_columns = list(v).iter().filter_map(opt_string).collect();
        }

        Ok(())
    }

    /// Serializes the view for saving.
    #[must_use]
    pub fn get_data(&self) -> Value {
        json!({
            "id": self.id,
            "obj_type": self.obj_type,
            "name": self.name,
            "description": self.description,
            "system": self.system,
            "default": self.default,
            "user_id": self.user_id,
            "team_id": self.team_id,
            "report_id": self.report_id,
            "scope": self.scope,
            "filter_key": self.filter_key,
            "conditions": self.conditions.iter().map(Where::to_data).collect::<Vec<_>>(),
            "order_by": self.order_by.iter().map(OrderBy::to_data).collect::<Vec<_>>(),
            "table_columns": self.table_columns,
        })
    }
}

// PHP serializes an empty map as `{}` where a list is expected.
fn list(value: &Value) -> &[Value] {
    value.as_array().map_or(&[][..], Vec::as_slice)
}
