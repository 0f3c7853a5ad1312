use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use netric_cache::{
    CacheConfig, CacheError, Clock, DefinitionCache, GroupingsCache, LoadError, ModelCache,
};
use netric_model::{DEFAULT_LIMIT, Group, Groupings, GroupingsKey};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use std::cell::Cell;
use std::sync::{Arc, Mutex};

struct FakeClock {
    now: Mutex<DateTime<Utc>>,
}

impl FakeClock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()),
        })
    }

    fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

fn task_payload(obj_type: &str) -> Value {
    json!({
        "obj_type": obj_type,
        "title": "Task",
        "revision": 4,
        "fields": {
            "id": {"type": "number"},
            "name": {"type": "text"},
            "owner_id": {"type": "object", "subtype": "user", "default": {"on": "null", "value": "-3"}}
        }
    })
}

// ── DefinitionCache ──────────────────────────────────────────────

#[test]
fn get_or_load_caches_until_stale() {
    let clock = FakeClock::new();
    let mut cache = DefinitionCache::new(TimeDelta::minutes(5), clock.clone());
    let calls = Cell::new(0);
    let loader = |obj_type: &str| -> Result<Value, LoadError> {
        calls.set(calls.get() + 1);
        Ok(task_payload(obj_type))
    };

    let first = cache.get_or_load("task", &loader).unwrap();
    let second = cache.get_or_load("task", &loader).unwrap();
    assert_eq!(calls.get(), 1);
    assert!(Arc::ptr_eq(&first, &second));

    clock.advance(TimeDelta::minutes(4));
    cache.get_or_load("task", &loader).unwrap();
    assert_eq!(calls.get(), 1);

    clock.advance(TimeDelta::minutes(1));
    assert!(cache.get("task").is_none());
    let reloaded = cache.get_or_load("task", &loader).unwrap();
    assert_eq!(calls.get(), 2);
    assert!(!Arc::ptr_eq(&first, &reloaded));
}

#[test]
fn is_fresh_at_reports_window() {
    let clock = FakeClock::new();
    let mut cache = DefinitionCache::new(TimeDelta::minutes(5), clock.clone());
    cache.insert_data(&task_payload("task")).unwrap();

    let now = clock.now();
    assert!(cache.is_fresh_at("task", now + TimeDelta::seconds(299)));
    assert!(!cache.is_fresh_at("task", now + TimeDelta::seconds(300)));
    assert!(!cache.is_fresh_at("note", now));
}

#[test]
fn loader_failure_is_wrapped() {
    let mut cache = DefinitionCache::new(TimeDelta::minutes(5), FakeClock::new());
    let loader = |_: &str| -> Result<Value, LoadError> { Err("server unreachable".into()) };

    match cache.get_or_load("task", &loader) {
        Err(CacheError::Loader(message)) => assert_eq!(message, "server unreachable"),
        other => panic!("expected loader error, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn mismatched_obj_type_is_rejected() {
    let mut cache = DefinitionCache::new(TimeDelta::minutes(5), FakeClock::new());
    let loader = |_: &str| -> Result<Value, LoadError> { Ok(task_payload("note")) };

    assert!(matches!(
        cache.get_or_load("task", &loader),
        Err(CacheError::ObjTypeMismatch { requested, received })
            if requested == "task" && received == "note"
    ));
    assert!(cache.get("note").is_none());
}

#[test]
fn bad_payload_is_a_model_error() {
    let mut cache = DefinitionCache::new(TimeDelta::minutes(5), FakeClock::new());
    let loader = |_: &str| -> Result<Value, LoadError> { Ok(json!({"title": "no type"})) };

    assert!(matches!(
        cache.get_or_load("task", &loader),
        Err(CacheError::Model(_))
    ));
}

#[test]
fn invalidate_and_clear() {
    let mut cache = DefinitionCache::new(TimeDelta::minutes(5), FakeClock::new());
    cache.insert_data(&task_payload("task")).unwrap();
    cache.insert_data(&task_payload("note")).unwrap();
    assert_eq!(cache.len(), 2);

    assert!(cache.invalidate("task"));
    assert!(!cache.invalidate("task"));
    assert!(cache.get("note").is_some());

    cache.clear();
    assert!(cache.is_empty());
}

// ── GroupingsCache ───────────────────────────────────────────────

fn groups_key() -> GroupingsKey {
    let mut filter = Map::new();
    filter.insert("user_id".into(), json!("-3"));
    GroupingsKey::new("customer", "groups", &filter)
}

#[test]
fn groupings_load_once_and_fill_identity_from_key() {
    let mut cache = GroupingsCache::new();
    let calls = Cell::new(0);
    let loader = |_: &GroupingsKey| -> Result<Value, LoadError> {
        calls.set(calls.get() + 1);
        Ok(json!({"groups": [{"id": 1, "name": "Partners"}]}))
    };
    let key = groups_key();

    let groupings = cache.get_or_load(&key, &loader).unwrap();
    assert_eq!(groupings.obj_type, "customer");
    assert_eq!(groupings.field_name, "groups");
    assert_eq!(groupings.key(), key);

    groupings.add_group(Group::new("Draft"));
    let again = cache.get_or_load(&key, &loader).unwrap();
    assert_eq!(again.get_groups().len(), 2);
    assert_eq!(calls.get(), 1);
}

#[test]
fn groupings_insert_and_invalidate() {
    let mut cache = GroupingsCache::new();
    let key = cache.insert(Groupings::new("customer", "groups"));

    cache
        .get_mut(&key)
        .unwrap()
        .add_group(Group::with_id("1", None, "Partners"));
    assert_eq!(cache.get(&key).unwrap().get_groups().len(), 1);
    assert!(cache.get(&groups_key()).is_none());

    assert!(cache.invalidate(&key));
    assert!(cache.is_empty());
}

#[test]
fn groupings_loader_failure_leaves_cache_empty() {
    let mut cache = GroupingsCache::new();
    let loader = |_: &GroupingsKey| -> Result<Value, LoadError> { Err("timeout".into()) };

    assert!(matches!(
        cache.get_or_load(&groups_key(), &loader),
        Err(CacheError::Loader(_))
    ));
    assert!(cache.is_empty());
}

// ── ModelCache ───────────────────────────────────────────────────

#[test]
fn default_config() {
    let config = CacheConfig::default();
    assert_eq!(config.definition_ttl, TimeDelta::minutes(5));
    assert_eq!(config.default_collection_limit, DEFAULT_LIMIT);
}

#[test]
fn create_entity_shares_cached_definition() {
    let mut cache = ModelCache::with_clock(CacheConfig::default(), FakeClock::new());
    let loader = |obj_type: &str| -> Result<Value, LoadError> { Ok(task_payload(obj_type)) };

    let a = cache
        .create_entity("task", Some(&json!({"id": 1, "name": "Write docs"})), &loader)
        .unwrap();
    let b = cache.create_entity("task", None, &loader).unwrap();

    assert!(Arc::ptr_eq(a.definition(), b.definition()));
    assert_eq!(a.get_name(), "Write docs");
    assert!(!a.is_dirty());
}

#[test]
fn new_entity_gets_create_defaults() {
    let mut cache = ModelCache::with_clock(CacheConfig::default(), FakeClock::new());
    let loader = |obj_type: &str| -> Result<Value, LoadError> { Ok(task_payload(obj_type)) };

    let entity = cache.create_entity("task", None, &loader).unwrap();
    assert_eq!(entity.id, None);
    assert_eq!(entity.get_value("owner_id"), Some(&json!("-3")));
}

#[test]
fn create_collection_uses_configured_limit() {
    let config = CacheConfig {
        default_collection_limit: 100,
        ..CacheConfig::default()
    };
    let mut cache = ModelCache::with_clock(config, FakeClock::new());
    let loader = |obj_type: &str| -> Result<Value, LoadError> { Ok(task_payload(obj_type)) };

    let mut collection = cache.create_collection("task", &loader).unwrap();
    assert_eq!(collection.limit(), 100);
    assert_eq!(collection.obj_type(), "task");

    collection
        .set_entities_data(&[json!({"id": 1, "name": "a"})])
        .unwrap();
    assert_eq!(collection.len_loaded(), 1);
}

#[test]
fn factory_propagates_loader_errors() {
    let mut cache = ModelCache::with_clock(CacheConfig::default(), FakeClock::new());
    let loader = |_: &str| -> Result<Value, LoadError> { Err("offline".into()) };

    assert!(matches!(
        cache.create_collection("task", &loader),
        Err(CacheError::Loader(_))
    ));
    assert!(cache.definitions().is_empty());
}
