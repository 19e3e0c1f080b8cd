//! Configuration for notification delivery
//!
//! The configuration is process-wide: it is installed once at startup with
//! [`init`] and read thereafter through [`current`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, OnceLock};

/// Tag carried by broadcast payloads that this consumer understands
pub const DEFAULT_BROADCAST_FORMAT: &str = "filament";

/// Namespace that action templates must live in
pub const DEFAULT_VIEW_NAMESPACE: &str = "filament-actions::";

/// Namespace that notification templates must live in
pub const DEFAULT_NOTIFICATION_VIEW_NAMESPACE: &str = "filament-notifications::";

/// Session key holding queued notification records
pub const DEFAULT_SESSION_KEY: &str = "filament.notifications";

static CONFIG: OnceLock<NotificationsConfig> = OnceLock::new();
static DEFAULT_CONFIG: LazyLock<NotificationsConfig> = LazyLock::new(NotificationsConfig::default);

/// Notification delivery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Where toasts are placed on screen
    #[serde(default)]
    pub alignment: Alignment,
    /// Broadcast `format` value accepted by the delivery controller
    #[serde(default = "default_broadcast_format")]
    pub broadcast_format: String,
    /// Template namespaces an action record may point its view at
    #[serde(default = "default_view_namespaces")]
    pub view_namespaces: Vec<String>,
    /// Template namespaces a notification record may point its view at
    #[serde(default = "default_notification_view_namespaces")]
    pub notification_view_namespaces: Vec<String>,
    /// Name of the session queue
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

/// Screen placement of the notification stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// Horizontal placement
    #[serde(default)]
    pub horizontal: HorizontalAlignment,
    /// Vertical placement
    #[serde(default)]
    pub vertical: VerticalAlignment,
}

/// Horizontal placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    /// Left edge
    Left,
    /// Centered
    Center,
    /// Right edge
    #[default]
    Right,
}

/// Vertical placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top edge
    #[default]
    Top,
    /// Centered
    Center,
    /// Bottom edge
    Bottom,
}

fn default_broadcast_format() -> String {
    DEFAULT_BROADCAST_FORMAT.to_string()
}

fn default_view_namespaces() -> Vec<String> {
    vec![DEFAULT_VIEW_NAMESPACE.to_string()]
}

fn default_notification_view_namespaces() -> Vec<String> {
    vec![DEFAULT_NOTIFICATION_VIEW_NAMESPACE.to_string()]
}

fn default_session_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            alignment: Alignment::default(),
            broadcast_format: default_broadcast_format(),
            view_namespaces: default_view_namespaces(),
            notification_view_namespaces: default_notification_view_namespaces(),
            session_key: default_session_key(),
        }
    }
}

impl NotificationsConfig {
    /// Load configuration from file
    pub async fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = async_fs::read_to_string(path).await?;

        // Try YAML first, then JSON
        let config: Self = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            _ => serde_json::from_str(&contents)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make every view or broadcast unusable
    pub fn validate(&self) -> Result<()> {
        if self.broadcast_format.trim().is_empty() {
            return Err(Error::config("broadcast_format cannot be empty"));
        }

        if let Some(namespace) = self
            .view_namespaces
            .iter()
            .chain(&self.notification_view_namespaces)
            .find(|namespace| !namespace.ends_with("::") || namespace.len() <= 2)
        {
            return Err(Error::config(format!(
                "view namespace '{namespace}' must be a name followed by '::'"
            )));
        }

        if self.session_key.trim().is_empty() {
            return Err(Error::config("session_key cannot be empty"));
        }

        Ok(())
    }

    /// Safety predicate for templates built from this configuration
    pub fn view_policy(&self) -> ViewPolicy {
        ViewPolicy::new(self.view_namespaces.clone())
            .with_notification_namespaces(self.notification_view_namespaces.clone())
    }
}

/// Install the process-wide configuration
///
/// Fails if a configuration was already installed.
pub fn init(config: NotificationsConfig) -> Result<()> {
    config.validate()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::config("notifications configuration already initialized"))
}

/// The process-wide configuration, or defaults when [`init`] was never called
pub fn current() -> &'static NotificationsConfig {
    CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

/// Allow-list of template namespaces for action and notification views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPolicy {
    namespaces: Vec<String>,
    notification_namespaces: Vec<String>,
}

impl ViewPolicy {
    /// Create a policy accepting the given namespace prefixes for actions
    ///
    /// Notification views keep the default namespace.
    pub fn new(namespaces: Vec<String>) -> Self {
        Self {
            namespaces,
            notification_namespaces: default_notification_view_namespaces(),
        }
    }

    /// Replace the namespace prefixes accepted for notification views
    pub fn with_notification_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.notification_namespaces = namespaces;
        self
    }

    /// Whether an action view may be rendered
    ///
    /// The view must start with an allowed namespace and the rest must be a
    /// dotted template path. Empty segments rule out `..` and leading dots.
    pub fn is_safe(&self, view: &str) -> bool {
        allows(&self.namespaces, view)
    }

    /// Whether a notification view may be rendered, under the same rules
    pub fn is_safe_notification(&self, view: &str) -> bool {
        allows(&self.notification_namespaces, view)
    }
}

fn allows(namespaces: &[String], view: &str) -> bool {
    namespaces.iter().any(|namespace| {
        view.strip_prefix(namespace.as_str())
            .is_some_and(is_template_path)
    })
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self::new(default_view_namespaces())
    }
}

fn is_template_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}
