//! Deferred boolean conditions for action flags

use std::fmt;
use std::sync::Arc;

/// Signature of a computed condition
pub type ConditionFn = dyn Fn(&EvaluationContext) -> bool + Send + Sync;

/// Runtime facts a computed condition may depend on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Notification owning the action, if known
    pub notification_id: Option<String>,
    /// Whether that notification is currently marked as read
    pub is_read: bool,
}

impl EvaluationContext {
    /// Context for an action attached to a notification
    pub fn for_notification(id: impl Into<String>, is_read: bool) -> Self {
        Self {
            notification_id: Some(id.into()),
            is_read,
        }
    }
}

/// A flag that is either fixed or computed at the point of use
#[derive(Clone)]
pub enum Condition {
    /// Fixed value
    Literal(bool),
    /// Evaluated lazily against an [`EvaluationContext`]
    Computed(Arc<ConditionFn>),
}

impl Condition {
    /// Wrap a closure as a computed condition
    pub fn computed<F>(condition: F) -> Self
    where
        F: Fn(&EvaluationContext) -> bool + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(condition))
    }

    /// Resolve the condition
    pub fn evaluate(&self, context: &EvaluationContext) -> bool {
        match self {
            Self::Literal(value) => *value,
            Self::Computed(condition) => condition(context),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::Literal(false)
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// Closures compare by identity
impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
