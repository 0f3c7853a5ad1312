use netric_model::{
    ActionDescriptor, ActionMode, ActionOutcome, ActionRegistry, DeleteIds, DeleteRequest,
};
use pretty_assertions::assert_eq;

fn names(actions: &[&ActionDescriptor]) -> Vec<String> {
    actions.iter().map(|a| a.name.clone()).collect()
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_string()).collect()
}

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn defaults_by_mode() {
    let registry = ActionRegistry::with_defaults();

    assert_eq!(
        names(&registry.actions_for("task", ActionMode::Browse)),
        vec!["new", "remove"]
    );
    assert_eq!(
        names(&registry.actions_for("task", ActionMode::View)),
        vec!["edit", "remove"]
    );
    assert!(registry.actions_for("task", ActionMode::Edit).is_empty());
}

#[test]
fn default_handlers() {
    let registry = ActionRegistry::with_defaults();

    assert_eq!(
        registry.perform("task", "new", &[]),
        Some(ActionOutcome::Create {
            obj_type: "task".to_string()
        })
    );
    assert_eq!(
        registry.perform("task", "edit", &ids(&["7", "8"])),
        Some(ActionOutcome::Open {
            obj_type: "task".to_string(),
            id: "7".to_string()
        })
    );
    assert_eq!(registry.perform("task", "edit", &[]), Some(ActionOutcome::Done));
}

#[test]
fn remove_builds_delete_request() {
    let registry = ActionRegistry::with_defaults();

    assert_eq!(
        registry.perform("task", "remove", &ids(&["7"])),
        Some(ActionOutcome::Delete(DeleteRequest::one("task", "7")))
    );

    let Some(ActionOutcome::Delete(request)) = registry.perform("task", "remove", &ids(&["7", "8"]))
    else {
        panic!("expected a delete request");
    };
    assert_eq!(request.id, DeleteIds::Many(ids(&["7", "8"])));

    assert_eq!(registry.perform("task", "remove", &[]), Some(ActionOutcome::Done));
}

#[test]
fn unknown_action_returns_none() {
    let registry = ActionRegistry::with_defaults();
    assert_eq!(registry.perform("task", "print", &[]), None);
}

// ── Overrides ────────────────────────────────────────────────────

fn email_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::with_defaults();
    registry.register_override(
        "email_message",
        ActionDescriptor::new("new", "Compose", |_: &str, _: &[String]| {
            ActionOutcome::Done
        })
        .with_modes(&[ActionMode::Browse]),
    );
    registry.register_override(
        "email_message",
        ActionDescriptor::new("reply", "Reply", |obj_type: &str, selected: &[String]| {
            ActionOutcome::Open {
                obj_type: obj_type.to_string(),
                id: selected.first().cloned().unwrap_or_default(),
            }
        })
        .with_icon("reply")
        .with_modes(&[ActionMode::View]),
    );
    registry
}

#[test]
fn override_replaces_default_for_its_type_only() {
    let registry = email_registry();

    let browse = registry.actions_for("email_message", ActionMode::Browse);
    assert_eq!(browse[0].title, "Compose");
    assert_eq!(registry.perform("email_message", "new", &[]), Some(ActionOutcome::Done));

    let other = registry.actions_for("task", ActionMode::Browse);
    assert_eq!(other[0].title, "New");
}

#[test]
fn overrides_add_type_specific_actions_after_defaults() {
    let registry = email_registry();

    assert_eq!(
        names(&registry.actions_for("email_message", ActionMode::View)),
        vec!["edit", "remove", "reply"]
    );
    assert_eq!(
        names(&registry.actions_for("task", ActionMode::View)),
        vec!["edit", "remove"]
    );
    assert_eq!(registry.perform("task", "reply", &[]), None);
}

#[test]
fn obj_types_restrict_defaults() {
    let mut registry = ActionRegistry::with_defaults();
    registry.register_default(
        ActionDescriptor::new("complete", "Mark Complete", |_: &str, _: &[String]| {
            ActionOutcome::Done
        })
        .for_obj_types(&["task"]),
    );

    assert!(names(&registry.actions_for("task", ActionMode::Browse)).contains(&"complete".to_string()));
    assert!(!names(&registry.actions_for("note", ActionMode::Browse)).contains(&"complete".to_string()));
    assert_eq!(registry.perform("note", "complete", &[]), None);
}

#[test]
fn registering_same_default_name_replaces_it() {
    let mut registry = ActionRegistry::with_defaults();
    registry.register_default(
        ActionDescriptor::new("remove", "Trash", |_: &str, _: &[String]| ActionOutcome::Done)
            .with_modes(&[ActionMode::Browse]),
    );

    let browse = registry.actions_for("task", ActionMode::Browse);
    assert_eq!(names(&browse), vec!["new", "remove"]);
    assert_eq!(browse[1].title, "Trash");
    assert!(names(&registry.actions_for("task", ActionMode::View)) == vec!["edit"]);
}

#[test]
fn descriptor_debug_omits_handler() {
    let registry = ActionRegistry::with_defaults();
    let debug = format!("{:?}", registry.actions_for("task", ActionMode::View)[0]);
    assert!(debug.contains("\"edit\""));
    assert!(debug.contains(".."));
}
