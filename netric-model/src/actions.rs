//! Toolbar actions.
//!
//! Each object type exposes a list of actions (new, edit, remove, ...) whose
//! availability depends on the screen mode. The [`ActionRegistry`] holds a
//! default set plus per-type overrides; an override replaces the default of
//! the same name for its type and can add actions of its own.

use crate::protocol::DeleteRequest;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The screen an action is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionMode {
    /// A list of entities.
    Browse,
    /// A single entity, read-only.
    View,
    /// A single entity being edited.
    Edit,
}

/// What the caller should do after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing further.
    Done,
    /// Open a blank entity of the type.
    Create { obj_type: String },
    /// Open an existing entity.
    Open { obj_type: String, id: String },
    /// Send this delete request.
    Delete(DeleteRequest),
}

/// Runs an action against the selected entity ids.
pub trait ActionHandler: Send + Sync {
    fn perform(&self, obj_type: &str, selected: &[String]) -> ActionOutcome;
}

impl<F> ActionHandler for F
where
    F: Fn(&str, &[String]) -> ActionOutcome + Send + Sync,
{
    fn perform(&self, obj_type: &str, selected: &[String]) -> ActionOutcome {
        self(obj_type, selected)
    }
}

#[derive(Clone)]
pub struct ActionDescriptor {
    pub name: String,
    pub title: String,
    pub icon: Option<String>,
    pub modes: Vec<ActionMode>,
    /// Types the action is limited to; empty means every type.
    pub obj_types: Vec<String>,
    pub handler: Arc<dyn ActionHandler>,
}

impl ActionDescriptor {
    pub fn new<H>(name: impl Into<String>, title: impl Into<String>, handler: H) -> Self
    where
        H: ActionHandler + 'static,
    {
        Self {
            name: name.into(),
            title: title.into(),
            icon: None,
            modes: vec![ActionMode::Browse, ActionMode::View],
            obj_types: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_modes(mut self, modes: &[ActionMode]) -> Self {
        self.modes = modes.to_vec();
        self
    }

    #[must_use]
    pub fn for_obj_types(mut self, obj_types: &[&str]) -> Self {
        self.obj_types = obj_types.iter().map(|t| (*t).to_string()).collect();
        self
    }

    fn applies_to(&self, obj_type: &str) -> bool {
        self.obj_types.is_empty() || self.obj_types.iter().any(|t| t == obj_type)
    }

    fn shown_in(&self, mode: ActionMode) -> bool {
        self.modes.contains(&mode)
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("modes", &self.modes)
            .field("obj_types", &self.obj_types)
            .finish_non_exhaustive()
    }
}

fn new_entity(obj_type: &str, _selected: &[String]) -> ActionOutcome {
    ActionOutcome::Create {
        obj_type: obj_type.to_string(),
    }
}

fn edit_entity(obj_type: &str, selected: &[String]) -> ActionOutcome {
    match selected.first() {
        Some(id) => ActionOutcome::Open {
            obj_type: obj_type.to_string(),
            id: id.clone(),
        },
        None => ActionOutcome::Done,
    }
}

fn remove_entities(obj_type: &str, selected: &[String]) -> ActionOutcome {
    if selected.is_empty() {
        return ActionOutcome::Done;
    }
    ActionOutcome::Delete(DeleteRequest::many(obj_type, selected.to_vec()))
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    defaults: Vec<ActionDescriptor>,
    overrides: HashMap<String, Vec<ActionDescriptor>>,
}

impl ActionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the standard `new`, `edit` and `remove` actions.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_default(
            ActionDescriptor::new("new", "New", new_entity)
                .with_icon("plus")
                .with_modes(&[ActionMode::Browse]),
        );
        registry.register_default(
            ActionDescriptor::new("edit", "Edit", edit_entity)
                .with_icon("pencil")
                .with_modes(&[ActionMode::View]),
        );
        registry.register_default(
            ActionDescriptor::new("remove", "Delete", remove_entities)
                .with_icon("trash")
                .with_modes(&[ActionMode::Browse, ActionMode::View]),
        );
        registry
    }

    /// Adds a default action, replacing one with the same name.
    pub fn register_default(&mut self, descriptor: ActionDescriptor) {
        replace_or_push(&mut self.defaults, descriptor);
    }

    /// Adds an action for one object type, replacing a default or earlier
    /// override of the same name for that type.
    pub fn register_override(&mut self, obj_type: &str, descriptor: ActionDescriptor) {
        replace_or_push(
            self.overrides.entry(obj_type.to_string()).or_default(),
            descriptor,
        );
    }

    fn effective(&self, obj_type: &str) -> Vec<&ActionDescriptor> {
        let overrides = self.overrides.get(obj_type).map_or(&[][..], Vec::as_slice);

        let mut actions: Vec<&ActionDescriptor> = self
            .defaults
            .iter()
            .map(|d| overrides.iter().find(|o| o.name == d.name).unwrap_or(d))
            .collect();
        actions.extend(
            overrides
                .iter()
                .filter(|o| !self.defaults.iter().any(|d| d.name == o.name)),
        );
        actions.retain(|a| a.applies_to(obj_type));
        actions
    }

    /// Actions shown for `obj_type` in `mode`, defaults first then
    /// type-specific additions.
    #[must_use]
    pub fn actions_for(&self, obj_type: &str, mode: ActionMode) -> Vec<&ActionDescriptor> {
        let mut actions = self.effective(obj_type);
        actions.retain(|a| a.shown_in(mode));
        actions
    }

    /// Runs the action `name` for `obj_type`. Returns `None` when no such
    /// action applies to the type.
    pub fn perform(&self, obj_type: &str, name: &str, selected: &[String]) -> Option<ActionOutcome> {
        let action = self
            .effective(obj_type)
            .into_iter()
            .find(|a| a.name == name)?;
        Some(action.handler.perform(obj_type, selected))
    }
}

fn replace_or_push(list: &mut Vec<ActionDescriptor>, descriptor: ActionDescriptor) {
    match list.iter_mut().find(|d| d.name == descriptor.name) {
        Some(existing) => *existing = descriptor,
        None => list.push(descriptor),
    }
}
