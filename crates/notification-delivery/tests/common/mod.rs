//! Common fixtures for notification delivery integration tests

#![allow(dead_code)]

use notification_delivery::{
    Action, ActionGroup, AuthenticatedUser, DeliveryController, MemorySessionStore, Notification,
    NotificationsConfig, Principal,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// An action exercising every field of the record
pub fn fully_populated_action() -> Action {
    Action::new("approve")
        .with_color("success")
        .with_icon("heroicon-o-check")
        .with_icon_position(notification_delivery::IconPosition::After)
        .with_icon_size(notification_delivery::IconSize::Large)
        .with_label("Approve request")
        .with_size(notification_delivery::ActionSize::Large)
        .button()
        .with_extra_attribute("data-testid", "approve")
        .with_extra_attribute("aria-describedby", "request-7")
        .outlined(true)
        .close(true)
        .mark_as_unread(true)
        .emit_to("request-list", "requestApproved", json!({ "id": 7, "tags": ["urgent"] }))
        .with_url(Some("https://example.com/requests/7".to_string()), true)
}

/// A notification record as a backend would queue it
pub fn queued_record(id: &str, title: &str) -> Value {
    Notification::with_id(id)
        .with_title(title)
        .with_body("Body text")
        .info()
        .with_action(Action::new("view").with_url(Some(format!("/items/{}", id)), false))
        .with_action(ActionGroup::new(vec![
            Action::new("archive").close(true),
            Action::new("read").mark_as_read(true),
        ]))
        .to_record()
}

/// A signed-in user with the default channel naming
pub fn user() -> Arc<dyn Principal> {
    Arc::new(AuthenticatedUser::new("App::Models::User", "42"))
}

/// Mount a controller over a memory session with default configuration
pub async fn mount(session: Arc<MemorySessionStore>) -> DeliveryController {
    DeliveryController::mount_with_config(session, Some(user()), &NotificationsConfig::default())
        .await
        .expect("Failed to mount controller")
}
