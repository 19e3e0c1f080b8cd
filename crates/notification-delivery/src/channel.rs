//! Broadcast channel naming for the viewing principal

use serde::{Deserialize, Serialize};

/// The authenticated identity viewing notifications
pub trait Principal: Send + Sync {
    /// Type path of the principal, e.g. `App::Models::User`
    fn type_name(&self) -> &str;

    /// Primary key of the principal
    fn key(&self) -> String;

    /// Channel the principal receives broadcasts on, when it chooses its own
    fn broadcast_channel(&self) -> Option<String> {
        None
    }
}

/// Channel name for a principal, `None` when nobody is signed in
///
/// Without a principal-supplied name the channel is the type path with `::`
/// replaced by `.`, then `.` and the key.
pub fn broadcast_channel(principal: Option<&dyn Principal>) -> Option<String> {
    let principal = principal?;

    if let Some(channel) = principal.broadcast_channel() {
        return Some(channel);
    }

    let type_name = principal.type_name().replace("::", ".");
    Some(format!("{}.{}", type_name, principal.key()))
}

/// A principal described by plain data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Type path
    pub type_name: String,
    /// Primary key
    pub key: String,
    /// Explicit broadcast channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl AuthenticatedUser {
    /// Create a user without a custom channel
    pub fn new(type_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            key: key.into(),
            channel: None,
        }
    }

    /// Use a custom broadcast channel
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

impl Principal for AuthenticatedUser {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn key(&self) -> String {
        self.key.clone()
    }

    fn broadcast_channel(&self) -> Option<String> {
        self.channel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated() {
        assert_eq!(broadcast_channel(None), None);
    }

    #[test]
    fn test_default_channel() {
        let user = AuthenticatedUser::new("App::Models::User", "42");
        assert_eq!(
            broadcast_channel(Some(&user)).as_deref(),
            Some("App.Models.User.42")
        );
    }

    #[test]
    fn test_custom_channel() {
        let user = AuthenticatedUser::new("App::Models::User", "42").with_channel("private-team.7");
        assert_eq!(broadcast_channel(Some(&user)).as_deref(), Some("private-team.7"));
    }
}
