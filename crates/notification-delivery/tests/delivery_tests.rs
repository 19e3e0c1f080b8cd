//! Integration tests for the delivery controller
//!
//! These cover the three delivery paths (session pull, live events and
//! broadcasts) converging on one collection.

use notification_delivery::{
    DeliveryController, InboundEvent, InteractionHandler, MemorySessionStore, Notification,
    NotificationsConfig, SessionStore, SledSessionStore, notification::NOTIFICATION_VIEW,
};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::*;

#[smol_potat::test]
async fn test_dedup_by_id() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;

    controller
        .push_from_event(&queued_record("n1", "first"))
        .expect("Failed to push first");
    controller
        .push_from_event(&queued_record("n1", "second"))
        .expect("Failed to push second");

    assert_eq!(controller.notifications().len(), 1);
    assert_eq!(
        controller.notifications().get("n1").and_then(Notification::title),
        Some("second")
    );
}

#[smol_potat::test]
async fn test_replace_keeps_position() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;

    for id in ["a", "b", "c"] {
        controller.push_from_event(&queued_record(id, id)).unwrap();
    }
    controller.push_from_event(&queued_record("a", "updated")).unwrap();

    let ids: Vec<&str> = controller.notifications().ids().collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[smol_potat::test]
async fn test_idempotent_close() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;
    controller.push_from_event(&queued_record("a", "A")).unwrap();
    controller.push_from_event(&queued_record("b", "B")).unwrap();

    assert!(controller.remove("a"));
    let after_first: Vec<String> = controller.notifications().ids().map(str::to_string).collect();

    assert!(!controller.remove("a"));
    assert!(!controller.remove("never-existed"));
    let after_second: Vec<String> = controller.notifications().ids().map(str::to_string).collect();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second, vec!["b".to_string()]);
}

#[smol_potat::test]
async fn test_close_event_twice() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;
    controller.push_from_event(&queued_record("a", "A")).unwrap();

    for _ in 0..2 {
        controller
            .handle(InboundEvent::NotificationClosed("a".to_string()))
            .await
            .expect("Close should never fail");
    }
    assert!(controller.notifications().is_empty());
}

#[smol_potat::test]
async fn test_notifications_sent_redrains_session() {
    let session = Arc::new(MemorySessionStore::new());
    session.push(queued_record("early", "Early")).await.unwrap();

    let mut controller = mount(session.clone()).await;
    assert_eq!(controller.notifications().len(), 1);

    session.push(queued_record("late-1", "Late")).await.unwrap();
    session.push(queued_record("late-2", "Later")).await.unwrap();
    controller.handle(InboundEvent::NotificationsSent).await.unwrap();

    let ids: Vec<&str> = controller.notifications().ids().collect();
    assert_eq!(ids, vec!["early", "late-1", "late-2"]);

    // Nothing new queued: a second pull inserts nothing
    assert_eq!(controller.pull_from_session().await.unwrap(), 0);
    assert!(session.drain().await.unwrap().is_empty());
}

#[smol_potat::test]
async fn test_foreign_broadcast_ignored() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;

    let consumed = controller
        .handle_broadcast(&json!({ "format": "other", "id": "x" }))
        .unwrap();
    assert!(!consumed);

    let consumed = controller.handle_broadcast(&json!({ "id": "y" })).unwrap();
    assert!(!consumed);

    assert!(controller.notifications().is_empty());
}

#[smol_potat::test]
async fn test_native_broadcast_inserted() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;

    let message = Notification::with_id("b1")
        .with_title("Deployed")
        .success()
        .to_broadcast("filament");
    controller
        .handle(InboundEvent::Broadcast(message))
        .await
        .unwrap();

    assert!(controller.notifications().has("b1"));
}

#[smol_potat::test]
async fn test_broadcast_unsafe_view_keeps_default() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;

    let consumed = controller
        .handle_broadcast(&json!({ "format": "filament", "id": "x", "view": "evil::../../template" }))
        .unwrap();
    assert!(consumed);

    assert_eq!(
        controller.notifications().get("x").map(Notification::view),
        Some(NOTIFICATION_VIEW)
    );
}

#[smol_potat::test]
async fn test_custom_broadcast_format() {
    let config = NotificationsConfig {
        broadcast_format: "native".to_string(),
        ..NotificationsConfig::default()
    };
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = DeliveryController::mount_with_config(session, Some(user()), &config)
        .await
        .unwrap();

    assert!(!controller.handle_broadcast(&json!({ "format": "filament", "id": "x" })).unwrap());
    assert!(controller.handle_broadcast(&json!({ "format": "native", "id": "y" })).unwrap());
    let ids: Vec<&str> = controller.notifications().ids().collect();
    assert_eq!(ids, vec!["y"]);
}

#[smol_potat::test]
async fn test_push_and_broadcast_race_last_wins() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;

    controller.push_from_event(&queued_record("same", "from push")).unwrap();
    let mut broadcast = queued_record("same", "from broadcast");
    broadcast["format"] = json!("filament");
    controller.handle_broadcast(&broadcast).unwrap();

    assert_eq!(controller.notifications().len(), 1);
    assert_eq!(
        controller.notifications().get("same").and_then(Notification::title),
        Some("from broadcast")
    );
}

#[smol_potat::test]
async fn test_malformed_live_event_leaves_collection_intact() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;
    controller.push_from_event(&queued_record("a", "A")).unwrap();

    let result = controller.push_from_event(&json!({ "id": "b", "actions": [{ "label": "x" }] }));
    assert!(result.is_err());

    let ids: Vec<&str> = controller.notifications().ids().collect();
    assert_eq!(ids, vec!["a"]);
}

#[smol_potat::test]
async fn test_broadcast_channel() {
    let session = Arc::new(MemorySessionStore::new());
    let controller = mount(session).await;
    assert_eq!(controller.broadcast_channel().as_deref(), Some("App.Models.User.42"));
}

#[smol_potat::test]
async fn test_event_loop_sequential() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session.clone()).await;
    let (sender, receiver) = async_channel::unbounded();

    session.push(queued_record("queued", "Queued")).await.unwrap();

    let events = vec![
        InboundEvent::NotificationSent(queued_record("live", "Live")),
        InboundEvent::NotificationSent(json!({ "id": "broken", "actions": "nope" })),
        InboundEvent::NotificationsSent,
        InboundEvent::Broadcast(json!({ "format": "other", "id": "foreign" })),
        InboundEvent::Broadcast(json!({ "format": "filament", "id": "cast" })),
        InboundEvent::ActionActivated {
            notification_id: "live".to_string(),
            action: "read".to_string(),
        },
        InboundEvent::ActionActivated {
            notification_id: "queued".to_string(),
            action: "archive".to_string(),
        },
        InboundEvent::NotificationClosed("cast".to_string()),
        InboundEvent::NotificationClosed("cast".to_string()),
    ];
    let count = events.len();
    for event in events {
        sender.send(event).await.unwrap();
    }
    drop(sender);

    let processed = controller.run(receiver).await;
    assert_eq!(processed, count);

    let ids: Vec<&str> = controller.notifications().ids().collect();
    assert_eq!(ids, vec!["live"]);
    assert!(controller.notifications().get("live").unwrap().is_read());
}

#[smol_potat::test]
async fn test_activation_reports_handler() {
    let session = Arc::new(MemorySessionStore::new());
    let mut controller = mount(session).await;
    controller.push_from_event(&queued_record("n1", "N")).unwrap();

    let activation = controller
        .handle(InboundEvent::ActionActivated {
            notification_id: "n1".to_string(),
            action: "view".to_string(),
        })
        .await
        .unwrap()
        .expect("Activation should be reported");

    assert_eq!(
        activation.handler,
        InteractionHandler::OpenUrl {
            url: "/items/n1".to_string(),
            new_tab: false,
        }
    );
    assert!(!activation.closed);
    assert!(controller.notifications().has("n1"));
}

#[smol_potat::test]
async fn test_sled_session_handoff() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.db");

    {
        let store = SledSessionStore::new(&db_path, "filament.notifications")
            .await
            .unwrap();
        Notification::with_id("persisted")
            .with_title("Survives restarts")
            .send(&store)
            .await
            .unwrap();
    }

    let store = Arc::new(
        SledSessionStore::new(&db_path, "filament.notifications")
            .await
            .unwrap(),
    );
    let controller = DeliveryController::mount_with_config(
        store.clone(),
        None,
        &NotificationsConfig::default(),
    )
    .await
    .unwrap();

    assert!(controller.notifications().has("persisted"));
    assert!(store.is_empty().await.unwrap());
}
