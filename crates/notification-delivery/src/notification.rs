//! Notifications and their wire records

use crate::{
    action::Action,
    action_group::ActionEntry,
    condition::EvaluationContext,
    config::{self, ViewPolicy},
    error::{Error, Result},
    record::RecordReader,
    session::SessionStore,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tracing::debug;
use uuid::Uuid;

const RECORD: &str = "notification";

/// Template rendering a single toast
pub const NOTIFICATION_VIEW: &str = "filament-notifications::notification";

/// How long a toast stays on screen unless the user dismisses it
pub const DEFAULT_DURATION_MS: u64 = 6000;

/// Semantic status of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Operation succeeded
    Success,
    /// Something needs attention
    Warning,
    /// Operation failed
    Danger,
    /// Neutral information
    Info,
}

impl Status {
    /// Wire token
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }

    /// Parse a wire token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Danger),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Icon shown when none was set explicitly
    pub fn default_icon(self) -> &'static str {
        match self {
            Self::Success => "heroicon-o-check-circle",
            Self::Warning => "heroicon-o-exclamation-circle",
            Self::Danger => "heroicon-o-x-circle",
            Self::Info => "heroicon-o-information-circle",
        }
    }
}

/// Display duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    /// Stays until dismissed
    Persistent,
    /// Dismissed after this many milliseconds
    Millis(u64),
}

impl Default for Duration {
    fn default() -> Self {
        Self::Millis(DEFAULT_DURATION_MS)
    }
}

impl Duration {
    fn to_wire(self) -> Value {
        match self {
            Self::Persistent => json!("persistent"),
            Self::Millis(ms) => json!(ms),
        }
    }

    fn from_wire(value: Option<&Value>) -> Result<Self> {
        let invalid = |value: &Value| {
            Error::invalid_field(
                RECORD,
                "duration",
                format!("expected milliseconds or \"persistent\", got {value}"),
            )
        };

        match value {
            None => Ok(Self::default()),
            Some(Value::Number(ms)) => ms.as_u64().map(Self::Millis).ok_or_else(|| invalid(&json!(ms))),
            Some(Value::String(text)) if text == "persistent" => Ok(Self::Persistent),
            Some(Value::String(text)) => text
                .trim()
                .parse()
                .map(Self::Millis)
                .map_err(|_| invalid(&json!(text))),
            Some(other) => Err(invalid(other)),
        }
    }
}

/// A transient message with optional actions, shown to one client session
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: String,
    title: Option<String>,
    body: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    icon_color: Option<String>,
    status: Option<Status>,
    duration: Duration,
    view: String,
    view_data: Map<String, Value>,
    actions: Vec<ActionEntry>,
    read_at: Option<DateTime<Utc>>,
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}

impl Notification {
    /// Create a notification with a fresh id
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create a notification with a caller-chosen id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: None,
            color: None,
            icon: None,
            icon_color: None,
            status: None,
            duration: Duration::default(),
            view: NOTIFICATION_VIEW.to_string(),
            view_data: Map::new(),
            actions: Vec::new(),
            read_at: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the icon color
    pub fn with_icon_color(mut self, color: impl Into<String>) -> Self {
        self.icon_color = Some(color.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Mark as a success
    pub fn success(self) -> Self {
        self.with_status(Status::Success)
    }

    /// Mark as a warning
    pub fn warning(self) -> Self {
        self.with_status(Status::Warning)
    }

    /// Mark as a failure
    pub fn danger(self) -> Self {
        self.with_status(Status::Danger)
    }

    /// Mark as neutral information
    pub fn info(self) -> Self {
        self.with_status(Status::Info)
    }

    /// Set the display duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Keep on screen until dismissed
    pub fn persistent(self) -> Self {
        self.with_duration(Duration::Persistent)
    }

    /// Set the template and its data
    pub fn with_view(mut self, view: impl Into<String>, data: Map<String, Value>) -> Self {
        self.view = view.into();
        self.view_data = data;
        self
    }

    /// Append an action or group
    pub fn with_action(mut self, entry: impl Into<ActionEntry>) -> Self {
        self.actions.push(entry.into());
        self
    }

    /// Replace the action list
    pub fn with_actions(mut self, entries: Vec<ActionEntry>) -> Self {
        self.actions = entries;
        self
    }

    /// Delivery id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Body
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Color, falling back to the status name
    pub fn color(&self) -> Option<&str> {
        self.color
            .as_deref()
            .or_else(|| self.status.map(Status::as_str))
    }

    /// Icon, falling back to the status icon
    pub fn icon(&self) -> Option<&str> {
        self.icon
            .as_deref()
            .or_else(|| self.status.map(Status::default_icon))
    }

    /// Icon color, falling back to the status name
    pub fn icon_color(&self) -> Option<&str> {
        self.icon_color
            .as_deref()
            .or_else(|| self.status.map(Status::as_str))
    }

    /// Status
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Display duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Template
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Template data
    pub fn view_data(&self) -> &Map<String, Value> {
        &self.view_data
    }

    /// Action list in render order
    pub fn actions(&self) -> &[ActionEntry] {
        &self.actions
    }

    /// Find an action by name, looking inside groups
    pub fn find_action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find_map(|entry| entry.find(name))
    }

    /// When the notification was marked as read
    pub fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Whether the notification is marked as read
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Mark as read now, keeping an earlier timestamp
    pub fn mark_as_read(&mut self) {
        if self.read_at.is_none() {
            self.read_at = Some(Utc::now());
        }
    }

    /// Clear the read mark
    pub fn mark_as_unread(&mut self) {
        self.read_at = None;
    }

    /// Context for resolving this notification's action conditions
    pub fn evaluation_context(&self) -> EvaluationContext {
        EvaluationContext::for_notification(self.id.clone(), self.is_read())
    }

    /// Flatten into a wire record
    pub fn to_record(&self) -> Value {
        let context = self.evaluation_context();
        let actions: Vec<Value> = self
            .actions
            .iter()
            .map(|entry| entry.to_record_in(&context))
            .collect();

        json!({
            "id": self.id,
            "actions": actions,
            "body": self.body,
            "color": self.color,
            "duration": self.duration.to_wire(),
            "icon": self.icon,
            "iconColor": self.icon_color,
            "status": self.status.map(Status::as_str),
            "title": self.title,
            "view": self.view,
            "viewData": self.view_data,
        })
    }

    /// Wire record tagged for broadcast delivery
    pub fn to_broadcast(&self, format: &str) -> Value {
        let mut record = self.to_record();
        if let Value::Object(fields) = &mut record {
            fields.insert("format".to_string(), json!(format));
        }
        record
    }

    /// Rebuild from a wire record using the process-wide view policy
    pub fn from_record(record: &Value) -> Result<Self> {
        Self::from_record_with(record, &config::current().view_policy())
    }

    /// Rebuild from a wire record
    ///
    /// A missing id gets a fresh one. A view failing the policy is ignored
    /// and the default template kept. Any malformed action rejects the whole
    /// notification.
    pub fn from_record_with(record: &Value, policy: &ViewPolicy) -> Result<Self> {
        let reader = RecordReader::new(RECORD, record)?;

        let id = match reader.filled_str("id")? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                debug!("Notification record without id, assigned {}", id);
                id
            }
        };

        let actions = reader
            .array("actions")?
            .iter()
            .map(|entry| ActionEntry::from_record_with(entry, policy))
            .collect::<Result<Vec<_>>>()?;

        let view = match reader.filled_str("view")? {
            Some(view) if view != NOTIFICATION_VIEW && !policy.is_safe_notification(&view) => {
                debug!("Ignoring unsafe view '{}' for notification {}", view, id);
                NOTIFICATION_VIEW.to_string()
            }
            Some(view) => view,
            None => NOTIFICATION_VIEW.to_string(),
        };

        let status = reader.optional_str("status")?;
        let status = status.as_deref().and_then(|token| {
            let parsed = Status::parse(token);
            if parsed.is_none() {
                debug!("Ignoring unknown status '{}' on notification {}", token, id);
            }
            parsed
        });

        Ok(Self {
            title: reader.optional_str("title")?,
            body: reader.optional_str("body")?,
            color: reader.optional_str("color")?,
            icon: reader.optional_str("icon")?,
            icon_color: reader.optional_str("iconColor")?,
            status,
            duration: Duration::from_wire(reader.value("duration"))?,
            view,
            view_data: reader.object("viewData")?,
            actions,
            read_at: None,
            id,
        })
    }

    /// Queue this notification for the session's next pull
    pub async fn send(&self, session: &dyn SessionStore) -> Result<()> {
        debug!("Queueing notification {}", self.id);
        session.push(self.to_record()).await
    }
}
