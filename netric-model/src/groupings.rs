//! Grouping (category) lists.
//!
//! A [`Groupings`] holds every group defined for one grouping field of an
//! object type, for example the `groups` field of `customer`. Groups are kept
//! as a flat list; the tree shown in navigation is derived on demand.

use crate::group::Group;
use crate::protocol::GroupingsKey;
use netric_types::Result;
use netric_types::wire::{as_object, opt_string};
use serde_json::{Map, Value, json};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Groupings {
    pub obj_type: String,
    pub field_name: String,
    pub filter: Map<String, Value>,
    groups: Vec<Group>,
}

impl Groupings {
    #[must_use]
    pub fn new(obj_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            obj_type: obj_type.into(),
            field_name: field_name.into(),
            ..Self::default()
        }
    }

    /// Sets the filter scoping this list (e.g. to one user's private groups).
    #[must_use]
    pub fn with_filter(mut self, filter: Map<String, Value>) -> Self {
        self.filter = filter;
        self
    }

    /// Parses `{obj_type, field_name, filter, groups}`.
    ///
    /// Nested `children` in the payload are flattened into the list, taking
    /// their parent from the enclosing group when they do not name one.
    pub fn from_data(data: &Value) -> Result<Self> {
        let map = as_object(data, "groupings")?;

        let mut groupings = Self {
            obj_type: map.get("obj_type").and_then(opt_string).unwrap_or_default(),
            field_name: map.get("field_name").and_then(opt_string).unwrap_or_default(),
            filter: map
                .get("filter")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            groups: Vec::new(),
        };

        if let Some(groups) = map.get("groups").and_then(Value::as_array) {
            for data in groups {
                let group = Group::from_data(data)?;
                groupings.push_flattened(group, None);
            }
        }

        Ok(groupings)
    }

    fn push_flattened(&mut self, mut group: Group, parent_id: Option<&str>) {
        if group.parent_id.is_none() {
            group.parent_id = parent_id.map(str::to_string);
        }
        let children = group.children.take().unwrap_or_default();
        let id = group.id.clone();
        self.groups.push(group);
        for child in children {
            self.push_flattened(child, id.as_deref());
        }
    }

    /// Serializes the flat list.
    #[must_use]
    pub fn to_data(&self) -> Value {
        json!({
            "obj_type": self.obj_type,
            "field_name": self.field_name,
            "filter": self.filter,
            "groups": self.groups.iter().map(Group::to_data).collect::<Vec<_>>(),
        })
    }

    /// The cache key for this list.
    #[must_use]
    pub fn key(&self) -> GroupingsKey {
        GroupingsKey::new(&self.obj_type, &self.field_name, &self.filter)
    }

    /// Returns the flat list of groups.
    #[must_use]
    pub fn get_groups(&self) -> &[Group] {
        &self.groups
    }

    /// Replaces the flat list.
    pub fn set_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups;
    }

    /// Finds a group by id.
    #[must_use]
    pub fn get_group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id.as_deref() == Some(id))
    }

    /// Appends a group.
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Replaces the stored group with the same id. Returns false if none matched.
    pub fn update_group(&mut self, group: Group) -> bool {
        let Some(id) = group.id.as_deref() else {
            return false;
        };
        match self.groups.iter_mut().find(|g| g.id.as_deref() == Some(id)) {
            Some(existing) => {
                *existing = group;
                true
            }
            None => false,
        }
    }

    /// Removes a group by id. Its children keep their `parent_id`.
    pub fn remove_group(&mut self, id: &str) -> Option<Group> {
        let index = self.groups.iter().position(|g| g.id.as_deref() == Some(id))?;
        Some(self.groups.remove(index))
    }

    /// Builds the tree below `parent_id` (`None` for the roots).
    ///
    /// Every returned node is a copy; the flat list is left untouched, so
    /// calling this repeatedly always yields the same tree. Only groups that
    /// have been saved (have an id) get a `children` list.
    #[must_use]
    pub fn get_groups_hierarch(&self, parent_id: Option<&str>) -> Vec<Group> {
        let mut ancestors = Vec::new();
        self.hierarch_below(parent_id, &mut ancestors)
    }

    fn hierarch_below<'a>(
        &'a self,
        parent_id: Option<&str>,
        ancestors: &mut Vec<&'a str>,
    ) -> Vec<Group> {
        let mut nodes = Vec::new();

        for group in self.groups.iter().filter(|g| g.parent_id.as_deref() == parent_id) {
            let mut node = group.clone();

            if let Some(id) = group.id.as_deref() {
                if ancestors.contains(&id) {
                    warn!(
                        obj_type = %self.obj_type,
                        field_name = %self.field_name,
                        group_id = %id,
                        "Grouping cycle detected; skipping group"
                    );
                    continue;
                }
                ancestors.push(id);
                node.children = Some(self.hierarch_below(Some(id), ancestors));
                ancestors.pop();
            }

            nodes.push(node);
        }

        nodes
    }
}
