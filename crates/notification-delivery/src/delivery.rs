//! Client-side delivery controller
//!
//! The controller owns the notifications shown to one session. It is fed
//! from three places: the session queue (pulled on mount and whenever
//! `notificationsSent` arrives), live `notificationSent` events, and
//! broadcast messages. All of them funnel into the same id-keyed collection,
//! so a notification delivered twice is shown once.

use crate::{
    action::InteractionHandler,
    channel::{self, Principal},
    collection::NotificationCollection,
    config::{self, NotificationsConfig, ViewPolicy},
    error::{Error, Result},
    models::InboundEvent,
    notification::Notification,
    session::SessionStore,
};
use async_channel::Receiver;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a user clicking an action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    /// Notification owning the action
    pub notification_id: String,
    /// Action name
    pub action: String,
    /// What the click resolved to
    pub handler: InteractionHandler,
    /// Whether the notification was removed as a result
    pub closed: bool,
}

/// Coordinator for the notifications of one client session
pub struct DeliveryController {
    notifications: NotificationCollection,
    session: Arc<dyn SessionStore>,
    principal: Option<Arc<dyn Principal>>,
    broadcast_format: String,
    view_policy: ViewPolicy,
}

impl DeliveryController {
    /// Mount with the process-wide configuration and pull queued notifications
    pub async fn mount(
        session: Arc<dyn SessionStore>,
        principal: Option<Arc<dyn Principal>>,
    ) -> Result<Self> {
        Self::mount_with_config(session, principal, config::current()).await
    }

    /// Mount with an explicit configuration and pull queued notifications
    pub async fn mount_with_config(
        session: Arc<dyn SessionStore>,
        principal: Option<Arc<dyn Principal>>,
        config: &NotificationsConfig,
    ) -> Result<Self> {
        let mut controller = Self {
            notifications: NotificationCollection::new(),
            session,
            principal,
            broadcast_format: config.broadcast_format.clone(),
            view_policy: config.view_policy(),
        };

        let pulled = controller.pull_from_session().await?;
        info!("Mounted notification controller with {} queued notifications", pulled);

        Ok(controller)
    }

    /// Notifications currently shown
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Drain the session queue into the collection
    ///
    /// Malformed records are logged and skipped. Returns how many
    /// notifications were inserted.
    pub async fn pull_from_session(&mut self) -> Result<usize> {
        let records = self.session.drain().await?;
        let mut inserted = 0;

        for record in &records {
            match Notification::from_record_with(record, &self.view_policy) {
                Ok(notification) => {
                    self.push(notification);
                    inserted += 1;
                }
                Err(e) => warn!("Skipping malformed queued notification: {}", e),
            }
        }

        debug!("Pulled {} of {} queued notifications", inserted, records.len());
        Ok(inserted)
    }

    /// Insert a notification sent as a live event
    pub fn push_from_event(&mut self, record: &Value) -> Result<()> {
        let notification = Notification::from_record_with(record, &self.view_policy)?;
        self.push(notification);
        Ok(())
    }

    /// Insert a broadcast notification if it is in the native format
    ///
    /// Returns whether the message was consumed. Messages in another format
    /// belong to another consumer of the channel and are ignored.
    pub fn handle_broadcast(&mut self, message: &Value) -> Result<bool> {
        let format = message.get("format").and_then(Value::as_str);
        if format != Some(self.broadcast_format.as_str()) {
            debug!("Ignoring broadcast message with format {:?}", format);
            return Ok(false);
        }

        let notification = Notification::from_record_with(message, &self.view_policy)?;
        self.push(notification);
        Ok(true)
    }

    /// Remove a notification; unknown ids are ignored
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.notifications.has(id) {
            debug!("Close for unknown notification {}", id);
            return false;
        }

        self.notifications.forget(id);
        debug!("Closed notification {}", id);
        true
    }

    /// Apply a click on one of a notification's actions
    ///
    /// Read state changes are applied to the collection, and the notification
    /// is removed when the action closes it. The resolved handler is returned
    /// so the caller can navigate or dispatch.
    pub fn activate(&mut self, notification_id: &str, action_name: &str) -> Result<Activation> {
        let notification = self
            .notifications
            .get_mut(notification_id)
            .ok_or_else(|| Error::NotificationNotFound(notification_id.to_string()))?;

        let action = notification
            .find_action(action_name)
            .ok_or_else(|| Error::ActionNotFound {
                notification: notification_id.to_string(),
                action: action_name.to_string(),
            })?;

        let Some(handler) = action.interaction_handler(&notification.evaluation_context()) else {
            debug!("Ignoring click on disabled action {}", action_name);
            return Ok(Activation {
                notification_id: notification_id.to_string(),
                action: action_name.to_string(),
                handler: InteractionHandler::Inert,
                closed: false,
            });
        };
        let should_close = action.should_close();

        match handler {
            InteractionHandler::MarkAsRead => notification.mark_as_read(),
            InteractionHandler::MarkAsUnread => notification.mark_as_unread(),
            _ => {}
        }

        if should_close {
            self.notifications.forget(notification_id);
        }

        Ok(Activation {
            notification_id: notification_id.to_string(),
            action: action_name.to_string(),
            handler,
            closed: should_close,
        })
    }

    /// Dispatch a wire event
    pub async fn handle(&mut self, event: InboundEvent) -> Result<Option<Activation>> {
        debug!("Handling {} event", event.name());

        match event {
            InboundEvent::NotificationSent(record) => self.push_from_event(&record)?,
            InboundEvent::NotificationsSent => {
                self.pull_from_session().await?;
            }
            InboundEvent::NotificationClosed(id) => {
                self.remove(&id);
            }
            InboundEvent::Broadcast(message) => {
                if self.broadcast_channel().is_none() {
                    debug!("Ignoring broadcast for unauthenticated session");
                } else {
                    self.handle_broadcast(&message)?;
                }
            }
            InboundEvent::ActionActivated {
                notification_id,
                action,
            } => return self.activate(&notification_id, &action).map(Some),
        }

        Ok(None)
    }

    /// Process events one at a time until the channel closes
    ///
    /// A failing event is logged and does not stop the loop. Returns the
    /// number of events processed.
    pub async fn run(&mut self, events: Receiver<InboundEvent>) -> usize {
        let mut processed = 0;

        while let Ok(event) = events.recv().await {
            let name = event.name();
            if let Err(e) = self.handle(event).await {
                warn!("Failed to handle {} event: {}", name, e);
            }
            processed += 1;
        }

        info!("Event stream closed after {} events", processed);
        processed
    }

    /// Channel to subscribe to for broadcasts, `None` when unauthenticated
    pub fn broadcast_channel(&self) -> Option<String> {
        channel::broadcast_channel(self.principal.as_deref())
    }

    fn push(&mut self, notification: Notification) {
        let id = notification.id().to_string();
        if self.notifications.put(id.clone(), notification).is_some() {
            debug!("Replaced notification {}", id);
        } else {
            debug!("Added notification {}", id);
        }
    }
}
