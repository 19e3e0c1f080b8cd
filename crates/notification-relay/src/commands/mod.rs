pub mod channel;
pub mod enqueue;
pub mod replay;

use clap::Args;
use notification_delivery::{AuthenticatedUser, Principal};
use std::sync::Arc;

/// Identity of the user viewing notifications
#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    /// User type path, e.g. `App::Models::User`
    #[arg(long, requires = "user_key")]
    pub user_type: Option<String>,

    /// User primary key
    #[arg(long, requires = "user_type")]
    pub user_key: Option<String>,

    /// Explicit broadcast channel for the user
    #[arg(long, requires = "user_type")]
    pub channel: Option<String>,
}

impl UserArgs {
    /// The signed-in principal, `None` when no user was given
    pub fn principal(&self) -> Option<Arc<dyn Principal>> {
        let (Some(type_name), Some(key)) = (&self.user_type, &self.user_key) else {
            return None;
        };

        let mut user = AuthenticatedUser::new(type_name, key);
        if let Some(channel) = &self.channel {
            user = user.with_channel(channel);
        }
        Some(Arc::new(user))
    }
}
