//! Notification actions and their wire records
//!
//! An [`Action`] is a clickable control attached to a notification. It is
//! built on the sending side, flattened with [`Action::to_record`], and
//! rebuilt on the receiving side with [`Action::from_record`]. Every key of
//! the record is always written; every key is optional on input except
//! `name`.

use crate::{
    condition::{Condition, EvaluationContext},
    config::{self, ViewPolicy},
    error::Result,
    record::RecordReader,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::debug;

const RECORD: &str = "action";

/// Template rendering the action as a text link
pub const LINK_VIEW: &str = "filament-actions::link-action";
/// Template rendering the action as a button
pub const BUTTON_VIEW: &str = "filament-actions::button-action";
/// Template rendering the action as an icon-only button
pub const ICON_BUTTON_VIEW: &str = "filament-actions::icon-button-action";
/// Template rendering the action as a badge
pub const BADGE_VIEW: &str = "filament-actions::badge-action";

/// Icon placement relative to the label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IconPosition {
    /// Icon before the label
    #[default]
    Before,
    /// Icon after the label
    After,
}

impl IconPosition {
    /// Wire token
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }

    /// Parse a wire token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            _ => None,
        }
    }
}

/// Icon size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// Small icon
    Small,
    /// Medium icon
    Medium,
    /// Large icon
    Large,
}

impl IconSize {
    /// Wire token
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
        }
    }

    /// Parse a wire token, long names included
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "sm" | "small" => Some(Self::Small),
            "md" | "medium" => Some(Self::Medium),
            "lg" | "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Control size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionSize {
    /// Extra small
    ExtraSmall,
    /// Small
    #[default]
    Small,
    /// Medium
    Medium,
    /// Large
    Large,
    /// Extra large
    ExtraLarge,
}

impl ActionSize {
    /// Wire token
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExtraSmall => "xs",
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
            Self::ExtraLarge => "xl",
        }
    }

    /// Parse a wire token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "xs" => Some(Self::ExtraSmall),
            "sm" => Some(Self::Small),
            "md" => Some(Self::Medium),
            "lg" => Some(Self::Large),
            "xl" => Some(Self::ExtraLarge),
            _ => None,
        }
    }
}

/// Where an emitted event is dispatched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", content = "component", rename_all = "snake_case")]
pub enum EmitScope {
    /// Every listener
    #[default]
    Global,
    /// Only the component owning the action
    #[serde(rename = "self")]
    SelfScoped,
    /// The parent of the owning component
    Up,
    /// A named component; `None` dispatches to nobody
    To(Option<String>),
}

impl EmitScope {
    /// Wire value of `emitDirection`
    pub fn direction(&self) -> Option<&'static str> {
        match self {
            Self::Global => None,
            Self::SelfScoped => Some("self"),
            Self::Up => Some("up"),
            Self::To(_) => Some("to"),
        }
    }

    /// Wire value of `emitToComponent`
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::To(component) => component.as_deref(),
            _ => None,
        }
    }

    /// Build from the wire pair; unknown directions fall back to global
    pub fn from_wire(direction: Option<&str>, component: Option<String>) -> Self {
        match direction {
            Some("self") => Self::SelfScoped,
            Some("up") => Self::Up,
            Some("to") => Self::To(component),
            _ => Self::Global,
        }
    }

    /// Whether dispatching reaches anyone at all
    pub fn has_target(&self) -> bool {
        !matches!(self, Self::To(None))
    }
}

/// Behavior bound to a click on an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionHandler {
    /// Mark the owning notification as read
    MarkAsRead,
    /// Mark the owning notification as unread
    MarkAsUnread,
    /// Navigate to a URL
    OpenUrl {
        /// Target URL
        url: String,
        /// Open in a new tab
        new_tab: bool,
    },
    /// Dispatch an event
    Emit {
        /// Event name
        event: String,
        /// Event payload
        data: Value,
        /// Dispatch scope
        scope: EmitScope,
    },
    /// Nothing beyond optionally closing the notification
    Inert,
}

impl InteractionHandler {
    /// Whether the handler has no observable effect
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Inert => true,
            Self::Emit { scope, .. } => !scope.has_target(),
            _ => false,
        }
    }
}

/// A clickable control attached to a notification
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: String,
    color: Option<String>,
    event: Option<String>,
    event_data: Value,
    emit_scope: EmitScope,
    extra_attributes: BTreeMap<String, String>,
    icon: Option<String>,
    icon_position: IconPosition,
    icon_size: Option<IconSize>,
    is_outlined: bool,
    is_disabled: bool,
    label: Option<String>,
    should_close: bool,
    should_mark_as_read: Condition,
    should_mark_as_unread: Condition,
    url: Option<String>,
    should_open_url_in_new_tab: bool,
    size: ActionSize,
    view: String,
}

impl Action {
    /// Create an action with default presentation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            event: None,
            event_data: Value::Object(Map::new()),
            emit_scope: EmitScope::Global,
            extra_attributes: BTreeMap::new(),
            icon: None,
            icon_position: IconPosition::Before,
            icon_size: None,
            is_outlined: false,
            is_disabled: false,
            label: None,
            should_close: false,
            should_mark_as_read: Condition::default(),
            should_mark_as_unread: Condition::default(),
            url: None,
            should_open_url_in_new_tab: false,
            size: ActionSize::Small,
            view: LINK_VIEW.to_string(),
        }
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

    /// Set the icon position
    pub fn with_icon_position(mut self, position: IconPosition) -> Self {
        self.icon_position = position;
        self
    }

    /// Set the icon size
    pub fn with_icon_size(mut self, size: IconSize) -> Self {
        self.icon_size = Some(size);
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the control size
    pub fn with_size(mut self, size: ActionSize) -> Self {
        self.size = size;
        self
    }

    /// Set the template
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Render as a button
    pub fn button(self) -> Self {
        self.with_view(BUTTON_VIEW)
    }

    /// Render as a link
    pub fn link(self) -> Self {
        self.with_view(LINK_VIEW)
    }

    /// Render as an icon-only button
    pub fn icon_button(self) -> Self {
        self.with_view(ICON_BUTTON_VIEW)
    }

    /// Render as a badge
    pub fn badge(self) -> Self {
        self.with_view(BADGE_VIEW)
    }

    /// Add an HTML attribute to the rendered control
    pub fn with_extra_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_attributes.insert(key.into(), value.into());
        self
    }

    /// Render with an outline
    pub fn outlined(mut self, outlined: bool) -> Self {
        self.is_outlined = outlined;
        self
    }

    /// Disable every behavior
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = disabled;
        self
    }

    /// Close the owning notification when clicked
    pub fn close(mut self, close: bool) -> Self {
        self.should_close = close;
        self
    }

    /// Mark the owning notification as read when clicked
    pub fn mark_as_read(mut self, condition: impl Into<Condition>) -> Self {
        self.should_mark_as_read = condition.into();
        self
    }

    /// Mark the owning notification as unread when clicked
    pub fn mark_as_unread(mut self, condition: impl Into<Condition>) -> Self {
        self.should_mark_as_unread = condition.into();
        self
    }

    /// Navigate to a URL when clicked
    pub fn with_url(mut self, url: Option<String>, new_tab: bool) -> Self {
        self.url = url;
        self.should_open_url_in_new_tab = new_tab;
        self
    }

    /// Emit an event to every listener
    pub fn emit(self, event: impl Into<String>, data: Value) -> Self {
        self.with_emit(Some(event.into()), data, EmitScope::Global)
    }

    /// Emit an event to the owning component only
    pub fn emit_self(self, event: impl Into<String>, data: Value) -> Self {
        self.with_emit(Some(event.into()), data, EmitScope::SelfScoped)
    }

    /// Emit an event to the parent component
    pub fn emit_up(self, event: impl Into<String>, data: Value) -> Self {
        self.with_emit(Some(event.into()), data, EmitScope::Up)
    }

    /// Emit an event to a named component
    pub fn emit_to(self, component: impl Into<String>, event: impl Into<String>, data: Value) -> Self {
        self.with_emit(
            Some(event.into()),
            data,
            EmitScope::To(Some(component.into())),
        )
    }

    fn with_emit(mut self, event: Option<String>, data: Value, scope: EmitScope) -> Self {
        self.event = event;
        self.event_data = data;
        self.emit_scope = scope;
        self
    }

    /// Action name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Event emitted on click
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    /// Payload of the emitted event
    pub fn event_data(&self) -> &Value {
        &self.event_data
    }

    /// Dispatch scope of the emitted event
    pub fn emit_scope(&self) -> &EmitScope {
        &self.emit_scope
    }

    /// Extra HTML attributes
    pub fn extra_attributes(&self) -> &BTreeMap<String, String> {
        &self.extra_attributes
    }

    /// Icon
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Icon position
    pub fn icon_position(&self) -> IconPosition {
        self.icon_position
    }

    /// Icon size
    pub fn icon_size(&self) -> Option<IconSize> {
        self.icon_size
    }

    /// Whether the control is outlined
    pub fn is_outlined(&self) -> bool {
        self.is_outlined
    }

    /// Whether the control is disabled
    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    /// Explicit label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label to display, derived from the name when none was set
    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| headline(&self.name))
    }

    /// Whether clicking closes the owning notification
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Resolve the mark-as-read condition
    pub fn should_mark_as_read(&self, context: &EvaluationContext) -> bool {
        self.should_mark_as_read.evaluate(context)
    }

    /// Resolve the mark-as-unread condition
    pub fn should_mark_as_unread(&self, context: &EvaluationContext) -> bool {
        self.should_mark_as_unread.evaluate(context)
    }

    /// Navigation target
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether navigation opens a new tab
    pub fn should_open_url_in_new_tab(&self) -> bool {
        self.should_open_url_in_new_tab
    }

    /// Control size
    pub fn size(&self) -> ActionSize {
        self.size
    }

    /// Template
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Resolve what a click does
    ///
    /// Mark-as-read beats mark-as-unread, which beats the URL or event
    /// behavior. Disabled actions do nothing.
    pub fn interaction_handler(&self, context: &EvaluationContext) -> Option<InteractionHandler> {
        if self.is_disabled {
            return None;
        }

        if self.should_mark_as_read(context) {
            return Some(InteractionHandler::MarkAsRead);
        }

        if self.should_mark_as_unread(context) {
            return Some(InteractionHandler::MarkAsUnread);
        }

        Some(self.base_handler())
    }

    fn base_handler(&self) -> InteractionHandler {
        if let Some(url) = &self.url {
            return InteractionHandler::OpenUrl {
                url: url.clone(),
                new_tab: self.should_open_url_in_new_tab,
            };
        }

        match &self.event {
            Some(event) => InteractionHandler::Emit {
                event: event.clone(),
                data: self.event_data.clone(),
                scope: self.emit_scope.clone(),
            },
            None => InteractionHandler::Inert,
        }
    }

    /// Flatten into a wire record
    pub fn to_record(&self) -> Value {
        self.to_record_in(&EvaluationContext::default())
    }

    /// Flatten into a wire record, resolving conditions against a context
    pub fn to_record_in(&self, context: &EvaluationContext) -> Value {
        json!({
            "name": self.name,
            "color": self.color,
            "event": self.event,
            "eventData": self.event_data,
            "emitDirection": self.emit_scope.direction(),
            "emitToComponent": self.emit_scope.component(),
            "extraAttributes": self.extra_attributes,
            "icon": self.icon,
            "iconPosition": self.icon_position.as_str(),
            "iconSize": self.icon_size.map(IconSize::as_str),
            "isOutlined": self.is_outlined,
            "isDisabled": self.is_disabled,
            "label": self.label,
            "shouldClose": self.should_close,
            "shouldMarkAsRead": self.should_mark_as_read(context),
            "shouldMarkAsUnread": self.should_mark_as_unread(context),
            "shouldOpenUrlInNewTab": self.should_open_url_in_new_tab,
            "size": self.size.as_str(),
            "url": self.url,
            "view": self.view,
        })
    }

    /// Rebuild from a wire record using the process-wide view policy
    pub fn from_record(record: &Value) -> Result<Self> {
        Self::from_record_with(record, &config::current().view_policy())
    }

    /// Rebuild from a wire record
    ///
    /// Only `name` is required, though it may be empty. A view failing the
    /// policy is ignored and the default template kept.
    pub fn from_record_with(record: &Value, policy: &ViewPolicy) -> Result<Self> {
        let reader = RecordReader::new(RECORD, record)?;
        let mut action = Self::new(reader.required_str("name")?);

        if let Some(view) = reader.filled_str("view")? {
            if view != action.view {
                if policy.is_safe(&view) {
                    action.view = view;
                } else {
                    debug!("Ignoring unsafe view '{}' for action {}", view, action.name);
                }
            }
        }

        if let Some(size) = reader.filled_str("size")? {
            match ActionSize::parse(&size) {
                Some(size) => action.size = size,
                None => debug!("Ignoring unknown size '{}' for action {}", size, action.name),
            }
        }

        action.should_close = reader.flag("shouldClose")?;
        action.color = reader.optional_str("color")?;
        action.is_disabled = reader.flag("isDisabled")?;

        action.event = reader.optional_str("event")?;
        action.event_data = reader
            .value("eventData")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        action.emit_scope = EmitScope::from_wire(
            reader.value("emitDirection").and_then(Value::as_str),
            reader.optional_str("emitToComponent")?,
        );

        action.extra_attributes = reader.string_map("extraAttributes")?;
        action.icon = reader.optional_str("icon")?;
        action.icon_position = reader
            .optional_str("iconPosition")?
            .as_deref()
            .and_then(IconPosition::parse)
            .unwrap_or_default();
        action.icon_size = reader
            .optional_str("iconSize")?
            .as_deref()
            .and_then(IconSize::parse);
        action.label = reader.optional_str("label")?;
        action.should_mark_as_read = reader.flag("shouldMarkAsRead")?.into();
        action.should_mark_as_unread = reader.flag("shouldMarkAsUnread")?.into();
        action.is_outlined = reader.flag("isOutlined")?;

        action.url = reader.optional_str("url")?;
        action.should_open_url_in_new_tab = reader.flag("shouldOpenUrlInNewTab")?;

        Ok(action)
    }
}

/// Turn an action name like `markAsRead.v2` into `Mark as read`
fn headline(name: &str) -> String {
    let base = name.split('.').next().unwrap_or_default();
    let mut words = String::with_capacity(base.len());
    let mut after_lower = false;

    for c in base.chars() {
        if c == '-' || c == '_' {
            words.push(' ');
            after_lower = false;
            continue;
        }
        if c.is_uppercase() && after_lower {
            words.push(' ');
        }
        after_lower = c.is_lowercase() || c.is_ascii_digit();
        words.extend(c.to_lowercase());
    }

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
