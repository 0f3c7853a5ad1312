//! Queryable, paginated entity lists.
//!
//! A [`Collection`] holds a query (conditions, sort order, offset, limit) and
//! the page(s) of entities loaded for it. Running the query is up to the
//! caller: send [`Collection::query_to_data`], then feed the response back
//! through [`Collection::load_result`].

use crate::browser_view::BrowserView;
use crate::condition::{BLogic, Where};
use crate::definition::Definition;
use crate::entity::Entity;
use crate::events::{CollectionEvent, SubscriptionId, Subscribers};
use crate::field::Field;
use crate::order_by::{Direction, OrderBy};
use crate::protocol::QueryResult;
use netric_types::wire::{as_object, opt_i64, opt_string};
use netric_types::{Error, Result, value_key};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Page size used when none is set.
pub const DEFAULT_LIMIT: i64 = 25;

const HASH_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct Collection {
    obj_type: String,
    definition: Option<Arc<Definition>>,
    conditions: Vec<Where>,
    order_by: Vec<OrderBy>,
    offset: i64,
    limit: i64,
    total_num: u64,
    /// Loaded entities by position. Positions below `slots` with no entry
    /// have not been loaded.
    entities: BTreeMap<usize, Entity>,
    slots: usize,
    subscribers: Subscribers<CollectionEvent>,
}

impl Collection {
    #[must_use]
    pub fn new(obj_type: impl Into<String>) -> Self {
        Self {
            obj_type: obj_type.into(),
            definition: None,
            conditions: Vec::new(),
            order_by: Vec::new(),
            offset: 0,
            limit: DEFAULT_LIMIT,
            total_num: 0,
            entities: BTreeMap::new(),
            slots: 0,
            subscribers: Subscribers::new(),
        }
    }

    /// Creates a collection bound to a definition, so results can be loaded.
    #[must_use]
    pub fn with_definition(definition: Arc<Definition>) -> Self {
        let mut collection = Self::new(definition.obj_type.clone());
        collection.definition = Some(definition);
        collection
    }

    #[must_use]
    pub fn obj_type(&self) -> &str {
        &self.obj_type
    }

    pub fn set_definition(&mut self, definition: Arc<Definition>) {
        self.definition = Some(definition);
    }

    #[must_use]
    pub fn definition(&self) -> Option<&Arc<Definition>> {
        self.definition.as_ref()
    }

    /// The fields of the attached definition.
    pub fn entity_fields(&self) -> Result<&[Field]> {
        self.definition
            .as_deref()
            .map(Definition::get_fields)
            .ok_or(Error::MissingDefinition)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&CollectionEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ── Query ───────────────────────────────────────────────────

    fn push_where(&mut self, field_name: &str, b_logic: BLogic) -> &mut Where {
        self.conditions.push(Where::with_logic(field_name, b_logic));
        let last = self.conditions.len() - 1;
        &mut self.conditions[last]
    }

    /// Adds an `and` condition and returns it for configuration:
    /// `collection.and_where("owner_id").equal_to("-3")`.
    pub fn and_where(&mut self, field_name: &str) -> &mut Where {
        self.push_where(field_name, BLogic::And)
    }

    pub fn or_where(&mut self, field_name: &str) -> &mut Where {
        self.push_where(field_name, BLogic::Or)
    }

    /// Same as [`Collection::and_where`].
    pub fn where_(&mut self, field_name: &str) -> &mut Where {
        self.and_where(field_name)
    }

    /// Appends a sort directive.
    pub fn set_order_by(&mut self, field_name: &str, direction: Direction) {
        self.order_by.push(OrderBy::new(field_name, direction));
    }

    #[must_use]
    pub fn conditions(&self) -> &[Where] {
        &self.conditions
    }

    #[must_use]
    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn clear_conditions(&mut self) {
        self.conditions.clear();
    }

    pub fn clear_order_by(&mut self) {
        self.order_by.clear();
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn set_limit(&mut self, limit: i64) {
        self.limit = limit;
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Replaces the query with a view's conditions and sort order.
    pub fn apply_view(&mut self, view: &BrowserView) {
        self.conditions.clone_from(&view.conditions);
        self.order_by.clone_from(&view.order_by);
    }

    /// Reads a query payload.
    ///
    /// Conditions and sort directives are appended to the current ones. The
    /// sort list is read from `order_by`, or `sort_order` when that is absent.
    pub fn query_from_data(&mut self, data: &Value) -> Result<()> {
        let map = as_object(data, "collection query")?;

        if let Some(obj_type) = map.get("obj_type").and_then(opt_string) {
            self.obj_type = obj_type;
        }

        if let Some(conditions) = map.get("conditions").and_then(Value::as_array) {
            for condition in conditions {
                self.conditions.push(Where::from_data(condition)?);
            }
        }

        let sort = map.get("order_by").or_else(|| map.get("sort_order"));
        if let Some(sort) = sort.and_then(Value::as_array) {
            for order in sort {
                self.order_by.push(OrderBy::from_data(order)?);
            }
        }

        if let Some(offset) = map.get("offset").and_then(opt_i64) {
            self.offset = offset;
        }
        if let Some(limit) = map.get("limit").and_then(opt_i64) {
            self.limit = limit;
        }

        Ok(())
    }

    /// The query request body: `{obj_type, conditions, order_by, offset?, limit?}`.
    #[must_use]
    pub fn query_to_data(&self) -> Value {
        let mut data = Map::new();
        data.insert("obj_type".into(), Value::String(self.obj_type.clone()));
        data.insert(
            "conditions".into(),
            self.conditions.iter().map(Where::to_data).collect(),
        );
        data.insert(
            "order_by".into(),
            self.order_by.iter().map(OrderBy::to_data).collect(),
        );
        if self.offset != 0 {
            data.insert("offset".into(), self.offset.into());
        }
        if self.limit != 0 {
            data.insert("limit".into(), self.limit.into());
        }
        Value::Object(data)
    }

    /// A short, stable identifier of the query.
    ///
    /// Equal queries hash equal; reordering conditions or sort directives
    /// changes the hash. Offset and limit are not part of it.
    #[must_use]
    pub fn get_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.obj_type.as_bytes());
        for condition in &self.conditions {
            hasher.update(condition.b_logic.as_str().as_bytes());
            hasher.update(condition.field_name.as_bytes());
            hasher.update(condition.operator_str().as_bytes());
            hasher.update(value_key(&condition.value).as_bytes());
        }
        for order in &self.order_by {
            hasher.update(order.field_name.as_bytes());
            hasher.update(order.direction.as_str().as_bytes());
        }

        let mut hash = hex::encode(hasher.finalize());
        hash.truncate(HASH_LEN);
        hash
    }

    // ── Results ─────────────────────────────────────────────────

    /// Applies a query response.
    pub fn load_result(&mut self, result: &QueryResult) -> Result<()> {
        self.total_num = result.total_num;
        self.set_entities_data(&result.entities)
    }

    /// Stores a page of raw entity records at the current offset.
    ///
    /// With an offset of zero or less the list is replaced. Otherwise slots
    /// before the offset are kept, anything from the offset on is dropped,
    /// and missing slots up to the offset are left empty. Gaps take no
    /// storage, so any offset is accepted.
    pub fn set_entities_data(&mut self, records: &[Value]) -> Result<()> {
        let definition = self.definition.clone().ok_or(Error::MissingDefinition)?;

        let page = records
            .iter()
            .map(|data| Entity::from_data(Arc::clone(&definition), data))
            .collect::<Result<Vec<_>>>()?;
        let loaded = page.len();

        let start = if self.offset <= 0 {
            0
        } else {
            usize::try_from(self.offset)
                .map_err(|_| Error::InvalidData(format!("offset {} out of range", self.offset)))?
        };
        let end = start
            .checked_add(loaded)
            .ok_or_else(|| Error::InvalidData(format!("offset {} out of range", self.offset)))?;

        self.entities.retain(|&pos, _| pos < start);
        self.entities.extend((start..end).zip(page));
        self.slots = end;

        debug!(
            obj_type = %self.obj_type,
            offset = self.offset,
            loaded,
            "Loaded collection page"
        );
        self.subscribers.emit(&CollectionEvent::Load {
            offset: self.offset,
            loaded,
            total_num: self.total_num,
        });
        Ok(())
    }

    /// Loaded entities in position order, skipping empty slots.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// The entity at `index`, if that slot has been loaded.
    #[must_use]
    pub fn entity_at(&self, index: usize) -> Option<&Entity> {
        self.entities.get(&index)
    }

    pub fn entity_at_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(&index)
    }

    /// Number of slots, loaded or not.
    #[must_use]
    pub fn len_loaded(&self) -> usize {
        self.slots
    }

    /// Total matches on the server, across all pages.
    #[must_use]
    pub fn total_num(&self) -> u64 {
        self.total_num
    }

    pub fn set_total_num(&mut self, total_num: u64) {
        self.total_num = total_num;
    }
}
