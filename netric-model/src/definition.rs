//! Entity type definitions.
//!
//! A [`Definition`] is the server's description of one object type: its
//! ordered fields, the form templates used to render it on each device size,
//! and the browser views available for listing it. Definitions are read-only
//! once built and are shared by every entity and collection of the type.

use crate::browser_view::BrowserView;
use crate::field::Field;
use netric_types::wire::{as_object, opt_i64, opt_id, opt_string};
use netric_types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use tracing::warn;

/// Device size a form template targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSize {
    Small,
    Medium,
    Large,
    XLarge,
    /// The compact template used in hover cards.
    Infobox,
}

/// Form templates keyed by device size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Forms {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub xlarge: Option<String>,
    #[serde(default)]
    pub infobox: Option<String>,
}

impl Forms {
    #[must_use]
    pub fn get(&self, size: FormSize) -> Option<&str> {
        match size {
            FormSize::Small => self.small.as_deref(),
            FormSize::Medium => self.medium.as_deref(),
            FormSize::Large => self.large.as_deref(),
            FormSize::XLarge => self.xlarge.as_deref(),
            FormSize::Infobox => self.infobox.as_deref(),
        }
    }
}

const NAME_FIELDS: &[&str] = &["name", "title", "subject", "full_name"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Definition {
    pub obj_type: String,
    pub id: Option<String>,
    pub title: String,
    pub revision: i64,
    fields: Vec<Field>,
    views: Vec<BrowserView>,
    forms: Forms,
    default_view_id: Option<String>,
}

impl Definition {
    /// Creates a definition with the given fields.
    ///
    /// A field whose name was already declared is ignored.
    #[must_use]
    pub fn new(obj_type: impl Into<String>, fields: Vec<Field>) -> Self {
        let mut def = Self {
            obj_type: obj_type.into(),
            ..Self::default()
        };
        for field in fields {
            def.push_field(field);
        }
        def
    }

    /// Adds a browser view.
    #[must_use]
    pub fn with_view(mut self, view: BrowserView) -> Self {
        self.views.push(view);
        self
    }

    /// Sets the form templates.
    #[must_use]
    pub fn with_forms(mut self, forms: Forms) -> Self {
        self.forms = forms;
        self
    }

    /// Sets the server-chosen default view.
    #[must_use]
    pub fn with_default_view_id(mut self, id: impl Into<String>) -> Self {
        self.default_view_id = Some(id.into());
        self
    }

    fn push_field(&mut self, field: Field) {
        if self.fields.iter().any(|f| f.name == field.name) {
            warn!(
                obj_type = %self.obj_type,
                field = %field.name,
                "Duplicate field in definition; keeping the first"
            );
            return;
        }
        self.fields.push(field);
    }

    /// Parses a definition payload:
    /// `{obj_type, id, title, revision, fields, views, forms, default_view}`.
    ///
    /// `fields` may be a map keyed by field name or a list.
    pub fn from_data(data: &Value) -> Result<Self> {
        let map = as_object(data, "definition")?;

        let obj_type = map
            .get("obj_type")
            .and_then(opt_string)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidData("definition has no obj_type".to_string()))?;

        let mut def = Self {
            id: map.get("id").and_then(opt_id),
            title: map.get("title").and_then(opt_string).unwrap_or_default(),
            revision: map.get("revision").and_then(opt_i64).unwrap_or(0),
            default_view_id: map.get("default_view").and_then(opt_id),
            obj_type,
            ..Self::default()
        };

        match map.get("fields") {
            Some(Value::Object(fields)) => {
                for (name, data) in fields {
                    let mut field = Field::from_data(data)?;
                    if field.name.is_empty() {
                        field.name = name.clone();
                    }
                    def.push_field(field);
                }
            }
            Some(Value::Array(fields)) => {
                for data in fields {
                    def.push_field(Field::from_data(data)?);
                }
            }
            _ => {}
        }

        if let Some(views) = map.get("views").and_then(Value::as_array) {
            for data in views {
                let mut view = BrowserView::new(def.obj_type.clone());
                view.from_data(data)?;
                def.views.push(view);
            }
        }

        if let Some(forms) = map.get("forms").filter(|f| f.is_object()) {
            def.forms = Forms::deserialize(forms)?;
        }

        Ok(def)
    }

    /// Finds a field by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All fields, in declaration order.
    #[must_use]
    pub fn get_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields whose attribute `attr` equals `value`, e.g. `("subtype", "user")`.
    #[must_use]
    pub fn get_filtered_fields(&self, attr: &str, value: &Value) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.attribute(attr).as_ref() == Some(value))
            .collect()
    }

    /// The field used as the entity's title, if the type has one.
    #[must_use]
    pub fn get_name_field(&self) -> Option<&Field> {
        NAME_FIELDS.iter().find_map(|name| self.get_field(name))
    }

    #[must_use]
    pub fn get_views(&self) -> &[BrowserView] {
        &self.views
    }

    #[must_use]
    pub fn get_view(&self, id: &str) -> Option<&BrowserView> {
        self.views.iter().find(|v| v.id.as_deref() == Some(id))
    }

    #[must_use]
    pub fn get_form(&self, size: FormSize) -> Option<&str> {
        self.forms.get(size)
    }

    #[must_use]
    pub fn default_view_id(&self) -> Option<&str> {
        self.default_view_id.as_deref()
    }

    /// Resolves the view to show when none is chosen.
    ///
    /// Tries the server's default view id, then any view flagged default,
    /// and finally synthesizes a view listing only the `id` column.
    #[must_use]
    pub fn get_default_view(&self) -> Cow<'_, BrowserView> {
        if let Some(view) = self.default_view_id.as_deref().and_then(|id| self.get_view(id)) {
            return Cow::Borrowed(view);
        }

        if let Some(view) = self.views.iter().find(|v| v.default) {
            return Cow::Borrowed(view);
        }

        let mut view = BrowserView::new(self.obj_type.clone());
        view.table_columns = vec!["id".to_string()];
        Cow::Owned(view)
    }
}
