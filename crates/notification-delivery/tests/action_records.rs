//! Integration tests for the action and group record contract

use notification_delivery::{
    Action, ActionEntry, ActionGroup, EmitScope, EvaluationContext, InteractionHandler,
    ViewPolicy, action::LINK_VIEW,
};
use serde_json::{Value, json};

mod common;
use common::*;

fn native_policy() -> ViewPolicy {
    ViewPolicy::new(vec!["native::".to_string()])
}

#[test]
fn test_fully_populated_action_roundtrip() {
    let action = fully_populated_action();
    let record = action.to_record();

    let parsed = Action::from_record_with(&record, &ViewPolicy::default())
        .expect("Failed to parse action record");
    assert_eq!(parsed, action);
    assert_eq!(parsed.to_record(), record);

    assert_eq!(record["emitDirection"], json!("to"));
    assert_eq!(record["emitToComponent"], json!("request-list"));
    assert_eq!(record["extraAttributes"]["data-testid"], json!("approve"));
    assert_eq!(record["iconSize"], json!("lg"));
    assert_eq!(record["size"], json!("lg"));
}

#[test]
fn test_roundtrip_every_emit_scope() {
    let actions = [
        Action::new("a").emit("saved", json!({})),
        Action::new("b").emit_self("saved", json!([1, 2])),
        Action::new("c").emit_up("saved", json!("text")),
        Action::new("d").emit_to("panel", "saved", json!({ "id": 3 })),
        Action::from_record_with(
            &json!({ "name": "e", "event": "saved", "emitDirection": "to" }),
            &ViewPolicy::default(),
        )
        .unwrap(),
    ];

    for action in actions {
        let parsed = Action::from_record_with(&action.to_record(), &ViewPolicy::default()).unwrap();
        assert_eq!(parsed, action, "round-trip mismatch for {}", action.name());
    }
}

#[test]
fn test_foreign_view_keeps_default() {
    let action = Action::from_record_with(
        &json!({ "name": "a", "view": "evil::template" }),
        &native_policy(),
    )
    .unwrap();

    assert_eq!(action.view(), LINK_VIEW);
}

#[test]
fn test_allowed_view_overrides_default() {
    let action = Action::from_record_with(
        &json!({ "name": "a", "view": "native::button" }),
        &native_policy(),
    )
    .unwrap();

    assert_eq!(action.view(), "native::button");
}

#[test]
fn test_adversarial_views_never_applied() {
    let policy = native_policy();
    let adversarial = [
        "evil::template",
        "native::../../etc/passwd",
        "native::..",
        "native::",
        "native::a/b",
        "native::a..b",
        "native::a b",
        "native::a\0b",
        "NATIVE::button",
        " native::button",
        "native:button",
        "native:::button",
        "../native::button",
        "filament-actions::link-action",
    ];

    for view in adversarial {
        let action =
            Action::from_record_with(&json!({ "name": "a", "view": view }), &policy).unwrap();
        assert!(
            action.view() == LINK_VIEW || policy.is_safe(action.view()),
            "unsafe view accepted: {view:?}"
        );
        assert_eq!(action.view(), LINK_VIEW, "view {view:?} should be ignored");
    }
}

#[test]
fn test_non_string_view_is_invalid() {
    let result = Action::from_record_with(&json!({ "name": "a", "view": ["native::x"] }), &native_policy());
    assert!(result.is_err());
}

#[test]
fn test_priority_chain_all_combinations() {
    let context = EvaluationContext::default();

    for read in [false, true] {
        for unread in [false, true] {
            let action = Action::new("a")
                .mark_as_read(read)
                .mark_as_unread(unread)
                .emit("clicked", json!({}));

            let expected = if read {
                InteractionHandler::MarkAsRead
            } else if unread {
                InteractionHandler::MarkAsUnread
            } else {
                InteractionHandler::Emit {
                    event: "clicked".to_string(),
                    data: json!({}),
                    scope: EmitScope::Global,
                }
            };

            assert_eq!(
                action.interaction_handler(&context),
                Some(expected),
                "read={read} unread={unread}"
            );
        }
    }
}

#[test]
fn test_read_wins_over_unread_from_record() {
    let action = Action::from_record_with(
        &json!({ "name": "delete", "shouldMarkAsRead": true, "shouldMarkAsUnread": true }),
        &ViewPolicy::default(),
    )
    .unwrap();

    assert_eq!(
        action.interaction_handler(&EvaluationContext::default()),
        Some(InteractionHandler::MarkAsRead)
    );
}

#[test]
fn test_loosely_typed_flags() {
    let action = Action::from_record_with(
        &json!({
            "name": "a",
            "shouldClose": "1",
            "isOutlined": 1,
            "isDisabled": "false",
            "shouldMarkAsRead": null,
            "shouldOpenUrlInNewTab": "on",
            "url": "/x",
        }),
        &ViewPolicy::default(),
    )
    .unwrap();

    assert!(action.should_close());
    assert!(action.is_outlined());
    assert!(!action.is_disabled());
    assert!(!action.should_mark_as_read(&EvaluationContext::default()));
    assert!(action.should_open_url_in_new_tab());
}

#[test]
fn test_unknown_keys_tolerated() {
    let action = Action::from_record_with(
        &json!({ "name": "a", "badge": 3, "futureField": { "nested": true } }),
        &ViewPolicy::default(),
    )
    .unwrap();
    assert_eq!(action, Action::new("a"));
}

#[test]
fn test_group_roundtrip_nested_records() {
    let group = ActionGroup::new(vec![fully_populated_action(), Action::new("other")])
        .with_label("Manage")
        .with_color("gray");

    let parsed = ActionGroup::from_record_with(&group.to_record(), &ViewPolicy::default()).unwrap();
    assert_eq!(parsed, group);
}

#[test]
fn test_group_records_use_view_policy() {
    let group = ActionGroup::from_record_with(
        &json!({ "actions": [{ "name": "a", "view": "evil::x" }, { "name": "b", "view": "native::x" }] }),
        &native_policy(),
    )
    .unwrap();

    assert_eq!(group.actions()[0].view(), LINK_VIEW);
    assert_eq!(group.actions()[1].view(), "native::x");
}

#[test]
fn test_entry_list_preserves_kinds() {
    let records: Vec<Value> = vec![
        json!({ "name": "single" }),
        json!({ "actions": [{ "name": "inside" }], "label": "Menu" }),
        json!({ "actions": [] }),
    ];

    let entries: Vec<ActionEntry> = records
        .iter()
        .map(|record| ActionEntry::from_record_with(record, &ViewPolicy::default()).unwrap())
        .collect();

    assert!(matches!(entries[0], ActionEntry::Action(_)));
    assert!(matches!(entries[1], ActionEntry::Group(_)));
    assert!(matches!(&entries[2], ActionEntry::Group(group) if group.actions().is_empty()));
}
