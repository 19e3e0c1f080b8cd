//! Ordered, id-keyed store of live notifications

use crate::notification::Notification;
use indexmap::IndexMap;
use serde_json::Value;

/// Notifications currently on screen, in first-insertion order
///
/// Re-inserting an existing id replaces the value where it stands; the entry
/// does not move to the end.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    entries: IndexMap<String, Notification>,
}

impl NotificationCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the replaced notification
    pub fn put(&mut self, id: impl Into<String>, notification: Notification) -> Option<Notification> {
        self.entries.insert(id.into(), notification)
    }

    /// Insert or replace under the notification's own id
    pub fn push(&mut self, notification: Notification) -> Option<Notification> {
        let id = notification.id().to_string();
        self.put(id, notification)
    }

    /// Whether an id is present
    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Look up by id
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.entries.get(id)
    }

    /// Look up by id for mutation
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Notification> {
        self.entries.get_mut(id)
    }

    /// Remove by id; absent ids are ignored
    pub fn forget(&mut self, id: &str) -> Option<Notification> {
        self.entries.shift_remove(id)
    }

    /// Number of notifications
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in render order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Notifications in render order
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.values()
    }

    /// Wire records in render order
    pub fn to_records(&self) -> Vec<Value> {
        self.iter().map(Notification::to_record).collect()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = indexmap::map::Values<'a, String, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
