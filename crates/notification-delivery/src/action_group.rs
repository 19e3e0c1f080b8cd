//! Action groups and the action list entry type

use crate::{
    action::{Action, IconPosition, IconSize},
    condition::EvaluationContext,
    config::{self, ViewPolicy},
    error::Result,
    record::RecordReader,
};
use serde_json::{Value, json};

const RECORD: &str = "action group";

/// Ordered actions rendered behind a single trigger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionGroup {
    actions: Vec<Action>,
    color: Option<String>,
    icon: Option<String>,
    icon_position: IconPosition,
    icon_size: Option<IconSize>,
    label: Option<String>,
    tooltip: Option<String>,
}

impl ActionGroup {
    /// Create a group from actions in render order
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Self::default()
        }
    }

    /// Set the trigger color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the trigger icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the trigger icon position
    pub fn with_icon_position(mut self, position: IconPosition) -> Self {
        self.icon_position = position;
        self
    }

    /// Set the trigger icon size
    pub fn with_icon_size(mut self, size: IconSize) -> Self {
        self.icon_size = Some(size);
        self
    }

    /// Set the trigger label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the trigger tooltip
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Actions in render order
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Trigger color
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Trigger icon
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Trigger icon position
    pub fn icon_position(&self) -> IconPosition {
        self.icon_position
    }

    /// Trigger icon size
    pub fn icon_size(&self) -> Option<IconSize> {
        self.icon_size
    }

    /// Trigger label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Trigger tooltip
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Find an action by name
    pub fn find(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.name() == name)
    }

    /// Flatten into a wire record
    pub fn to_record(&self) -> Value {
        self.to_record_in(&EvaluationContext::default())
    }

    /// Flatten into a wire record, resolving action conditions against a context
    pub fn to_record_in(&self, context: &EvaluationContext) -> Value {
        let actions: Vec<Value> = self
            .actions
            .iter()
            .map(|action| action.to_record_in(context))
            .collect();

        json!({
            "actions": actions,
            "color": self.color,
            "icon": self.icon,
            "iconPosition": self.icon_position.as_str(),
            "iconSize": self.icon_size.map(IconSize::as_str),
            "label": self.label,
            "tooltip": self.tooltip,
        })
    }

    /// Rebuild from a wire record using the process-wide view policy
    pub fn from_record(record: &Value) -> Result<Self> {
        Self::from_record_with(record, &config::current().view_policy())
    }

    /// Rebuild from a wire record
    ///
    /// Any malformed nested action rejects the whole group.
    pub fn from_record_with(record: &Value, policy: &ViewPolicy) -> Result<Self> {
        let reader = RecordReader::new(RECORD, record)?;

        let actions = reader
            .array("actions")?
            .iter()
            .map(|action| Action::from_record_with(action, policy))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            actions,
            color: reader.optional_str("color")?,
            icon: reader.optional_str("icon")?,
            icon_position: reader
                .optional_str("iconPosition")?
                .as_deref()
                .and_then(IconPosition::parse)
                .unwrap_or_default(),
            icon_size: reader
                .optional_str("iconSize")?
                .as_deref()
                .and_then(IconSize::parse),
            label: reader.optional_str("label")?,
            tooltip: reader.optional_str("tooltip")?,
        })
    }
}

/// One entry of a notification's action list
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEntry {
    /// A single action
    Action(Action),
    /// A group of actions behind one trigger
    Group(ActionGroup),
}

impl ActionEntry {
    /// Rebuild from a wire record, telling groups apart by their `actions` key
    pub fn from_record_with(record: &Value, policy: &ViewPolicy) -> Result<Self> {
        let reader = RecordReader::new("action", record)?;

        if reader.has("actions") {
            ActionGroup::from_record_with(record, policy).map(Self::Group)
        } else {
            Action::from_record_with(record, policy).map(Self::Action)
        }
    }

    /// Flatten into a wire record
    pub fn to_record_in(&self, context: &EvaluationContext) -> Value {
        match self {
            Self::Action(action) => action.to_record_in(context),
            Self::Group(group) => group.to_record_in(context),
        }
    }

    /// Find an action by name, looking inside groups
    pub fn find(&self, name: &str) -> Option<&Action> {
        match self {
            Self::Action(action) => (action.name() == name).then_some(action),
            Self::Group(group) => group.find(name),
        }
    }

    /// Iterate over the actions this entry holds
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        let actions: &[Action] = match self {
            Self::Action(action) => std::slice::from_ref(action),
            Self::Group(group) => group.actions(),
        };
        actions.iter()
    }
}

impl From<Action> for ActionEntry {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl From<ActionGroup> for ActionEntry {
    fn from(group: ActionGroup) -> Self {
        Self::Group(group)
    }
}
