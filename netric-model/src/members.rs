//! Membership sub-objects.
//!
//! Fields such as event attendees or project members are edited as a list of
//! member records. Members added in the client have no id yet; they are sent
//! to the server as `<field>_new` alongside the entity and created there.

use netric_types::wire::{lenient_id, lenient_string};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Any further member properties (role, invitation status, ...).
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Member {
    /// Creates an unsaved member.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Serializes the member record.
    #[must_use]
    pub fn to_data(&self) -> Value {
        let mut data = self.data.clone();
        data.insert(
            "id".into(),
            self.id.clone().map_or(Value::Null, Value::String),
        );
        data.insert("name".into(), Value::String(self.name.clone()));
        Value::Object(data)
    }

    fn matches(&self, key: &str) -> bool {
        self.id.as_deref() == Some(key) || self.name == key
    }
}

/// The members attached to one entity field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Members {
    members: Vec<Member>,
}

impl Members {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member, replacing any existing one with the same id or,
    /// for unsaved members, the same name.
    pub fn add(&mut self, member: Member) {
        let existing = self.members.iter().position(|m| match &member.id {
            Some(id) => m.id.as_ref() == Some(id),
            None => m.id.is_none() && m.name == member.name,
        });
        match existing {
            Some(index) => self.members[index] = member,
            None => self.members.push(member),
        }
    }

    /// Removes the member whose id or name is `key`.
    pub fn remove(&mut self, key: &str) -> Option<Member> {
        let index = self.members.iter().position(|m| m.matches(key))?;
        Some(self.members.remove(index))
    }

    #[must_use]
    pub fn get_all(&self) -> &[Member] {
        &self.members
    }

    /// Members not yet saved to the server.
    pub fn new_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.id.is_none())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
