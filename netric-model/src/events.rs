//! Change notifications.
//!
//! Entities and collections report mutations to subscribers registered on
//! the instance. A batch load reports once, never once per field.

use crate::entity::ValueName;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Notifications emitted by an `Entity`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityEvent {
    /// A single field was changed through a setter.
    Change {
        field_name: String,
        value: Value,
        value_name: ValueName,
    },
    /// A full record was applied by `load_data`.
    Load,
}

/// Notifications emitted by a `Collection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A page of entities was applied starting at `offset`.
    Load {
        offset: i64,
        loaded: usize,
        total_num: u64,
    },
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// The subscriber list of one instance.
pub struct Subscribers<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Subscribers<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    /// Registers a callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Calls every callback in registration order.
    pub fn emit(&self, event: &E) {
        for (_, callback) in &self.callbacks {
            callback(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriptions belong to the instance they were registered on, so a clone
/// starts with none.
impl<E> Clone for Subscribers<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
