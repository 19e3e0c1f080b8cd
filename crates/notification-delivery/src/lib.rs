//! Toast notification records and client-side delivery
//!
//! This crate covers the contract between a backend that sends transient
//! notifications and the live client session that shows them:
//!
//! - [`Action`] and [`ActionGroup`] serialize to flat JSON records and back,
//!   tolerating loosely-typed input and refusing unsafe templates.
//! - [`NotificationCollection`] keeps notifications keyed by id in
//!   insertion order.
//! - [`DeliveryController`] merges the session queue, live events and
//!   broadcast messages into one collection and applies user actions.
//!
//! # Example
//!
//! ```no_run
//! use notification_delivery::{Action, DeliveryController, MemorySessionStore, Notification};
//! use std::sync::Arc;
//!
//! # async fn example() -> notification_delivery::Result<()> {
//! let session = Arc::new(MemorySessionStore::new());
//!
//! // Backend side
//! Notification::new()
//!     .with_title("Saved")
//!     .success()
//!     .with_action(Action::new("view").button().with_url(Some("/posts/1".into()), false))
//!     .send(session.as_ref())
//!     .await?;
//!
//! // Client side
//! let controller = DeliveryController::mount(session, None).await?;
//! assert_eq!(controller.notifications().len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod action;
pub mod action_group;
pub mod channel;
pub mod collection;
pub mod condition;
pub mod config;
pub mod delivery;
pub mod error;
pub mod models;
pub mod notification;
mod record;
pub mod session;

pub use action::{Action, ActionSize, EmitScope, IconPosition, IconSize, InteractionHandler};
pub use action_group::{ActionEntry, ActionGroup};
pub use channel::{AuthenticatedUser, Principal, broadcast_channel};
pub use collection::NotificationCollection;
pub use condition::{Condition, EvaluationContext};
pub use config::{NotificationsConfig, ViewPolicy};
pub use delivery::{Activation, DeliveryController};
pub use error::{Error, Result};
pub use models::InboundEvent;
pub use notification::{Duration, Notification, Status};
pub use session::{MemorySessionStore, SessionStore, SledSessionStore};

/// Re-export key types for convenience
pub mod prelude {
    pub use crate::{
        Action,
        ActionGroup,
        DeliveryController,
        Error,
        InboundEvent,
        Notification,
        NotificationCollection,
        Result,
        SessionStore,
    };
}
