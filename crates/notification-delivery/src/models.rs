//! Wire-level events consumed by the delivery controller

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events reaching a live client session
///
/// Encoded as `{"event": <name>, "payload": <data>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum InboundEvent {
    /// A single notification record sent during the current request
    NotificationSent(Value),
    /// Notifications were queued in the session; pull them
    NotificationsSent,
    /// The user or the client closed a notification
    NotificationClosed(String),
    /// An out-of-band broadcast message
    Broadcast(Value),
    /// The user clicked an action
    ActionActivated {
        /// Notification owning the action
        #[serde(rename = "notificationId")]
        notification_id: String,
        /// Action name
        action: String,
    },
}

impl InboundEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotificationSent(_) => "notificationSent",
            Self::NotificationsSent => "notificationsSent",
            Self::NotificationClosed(_) => "notificationClosed",
            Self::Broadcast(_) => "broadcast",
            Self::ActionActivated { .. } => "actionActivated",
        }
    }
}
