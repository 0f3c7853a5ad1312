use netric_model::{Group, Groupings, GroupingsKey};
use pretty_assertions::assert_eq;
use serde_json::{Map, json};

fn sample() -> Groupings {
    let mut groupings = Groupings::new("customer", "groups");
    groupings.set_groups(vec![
        Group::with_id("1", None, "Partners"),
        Group::with_id("2", Some("1"), "West"),
        Group::with_id("3", Some("2"), "Seattle"),
        Group::with_id("4", None, "Vendors"),
        Group::new("Draft"),
    ]);
    groupings
}

fn names(groups: &[Group]) -> Vec<&str> {
    groups.iter().map(|g| g.name.as_str()).collect()
}

// ── Hierarchy ────────────────────────────────────────────────────

#[test]
fn hierarchy_partitions_by_parent() {
    let tree = sample().get_groups_hierarch(None);
    assert_eq!(names(&tree), vec!["Partners", "Vendors", "Draft"]);

    let partners = &tree[0];
    let west = &partners.children.as_ref().unwrap()[0];
    assert_eq!(west.name, "West");
    assert_eq!(names(west.children.as_ref().unwrap()), vec!["Seattle"]);
}

#[test]
fn only_saved_groups_get_children() {
    let tree = sample().get_groups_hierarch(None);
    assert_eq!(tree[1].children, Some(vec![]));
    assert_eq!(tree[2].children, None);
}

#[test]
fn hierarchy_below_a_parent() {
    let subtree = sample().get_groups_hierarch(Some("1"));
    assert_eq!(names(&subtree), vec!["West"]);
}

#[test]
fn hierarchy_leaves_flat_list_untouched() {
    let groupings = sample();
    let first = groupings.get_groups_hierarch(None);
    let second = groupings.get_groups_hierarch(None);

    assert_eq!(first, second);
    assert!(groupings.get_groups().iter().all(|g| g.children.is_none()));
}

#[test]
fn hierarchy_stops_at_cycles() {
    let mut groupings = Groupings::new("customer", "groups");
    groupings.set_groups(vec![
        Group::with_id("root", None, "Root"),
        Group::with_id("a", Some("root"), "A"),
        Group::with_id("b", Some("a"), "B"),
    ]);
    // Re-parent A under its own child.
    let mut a = groupings.get_group("a").unwrap().clone();
    a.parent_id = Some("b".to_string());
    assert!(groupings.update_group(a));
    groupings.add_group(Group::with_id("c", Some("b"), "C"));

    let tree = groupings.get_groups_hierarch(Some("b"));
    assert_eq!(names(&tree), vec!["A", "C"]);
    let below_a = tree[0].children.as_ref().unwrap();
    assert_eq!(names(below_a), vec!["B"]);
    // B's child A is already on the path, so only C appears below it.
    assert_eq!(names(below_a[0].children.as_ref().unwrap()), vec!["C"]);
}

// ── Editing ──────────────────────────────────────────────────────

#[test]
fn update_and_remove_by_id() {
    let mut groupings = sample();

    let mut renamed = Group::with_id("4", None, "Suppliers");
    renamed.color = "#336699".to_string();
    assert!(groupings.update_group(renamed));
    assert_eq!(groupings.get_group("4").unwrap().name, "Suppliers");

    assert!(!groupings.update_group(Group::new("No id")));
    assert!(!groupings.update_group(Group::with_id("99", None, "Missing")));

    let removed = groupings.remove_group("2").unwrap();
    assert_eq!(removed.name, "West");
    assert!(groupings.remove_group("2").is_none());
    assert_eq!(groupings.get_group("3").unwrap().parent_id.as_deref(), Some("2"));
}

// ── Wire format ──────────────────────────────────────────────────

#[test]
fn from_data_flattens_nested_children() {
    let groupings = Groupings::from_data(&json!({
        "obj_type": "customer",
        "field_name": "groups",
        "filter": {"user_id": "-3"},
        "groups": [
            {"id": 1, "name": "Partners", "is_heiarch": "t", "children": [
                {"id": 2, "name": "West", "sort_order": "3", "children": [
                    {"id": 3, "name": "Seattle"}
                ]}
            ]},
            {"id": "4", "name": "Vendors", "parent_id": null, "is_system": true}
        ]
    }))
    .unwrap();

    let flat = groupings.get_groups();
    assert_eq!(names(flat), vec!["Partners", "West", "Seattle", "Vendors"]);
    assert!(flat[0].heirarch);
    assert_eq!(flat[1].parent_id.as_deref(), Some("1"));
    assert_eq!(flat[1].sort_order, 3);
    assert_eq!(flat[2].parent_id.as_deref(), Some("2"));
    assert!(flat[3].system);
    assert!(flat.iter().all(|g| g.children.is_none()));

    let tree = groupings.get_groups_hierarch(None);
    assert_eq!(names(&tree), vec!["Partners", "Vendors"]);
}

#[test]
fn group_to_data_uses_wire_keys() {
    let mut group = Group::with_id("2", Some("1"), "West");
    group.heirarch = true;
    let data = group.to_data();

    assert_eq!(data["parent_id"], "1");
    assert_eq!(data["is_heiarch"], true);
    assert_eq!(data["is_system"], false);
    assert_eq!(data["children"], serde_json::Value::Null);
}

#[test]
fn to_data_round_trips() {
    let groupings = sample();
    let parsed = Groupings::from_data(&groupings.to_data()).unwrap();
    assert_eq!(parsed.get_groups(), groupings.get_groups());
    assert_eq!(parsed.key(), groupings.key());
}

// ── Keys ─────────────────────────────────────────────────────────

#[test]
fn key_ignores_filter_insertion_order() {
    let mut a = Map::new();
    a.insert("user_id".into(), json!(5));
    a.insert("team_id".into(), json!("2"));
    let mut b = Map::new();
    b.insert("team_id".into(), json!(2));
    b.insert("user_id".into(), json!("5"));

    let ga = Groupings::new("customer", "groups").with_filter(a);
    let gb = Groupings::new("customer", "groups").with_filter(b);
    assert_eq!(ga.key(), gb.key());
    assert_ne!(ga.key(), GroupingsKey::new("customer", "groups", &Map::new()));
}
