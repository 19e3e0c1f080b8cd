//! Error types for notification delivery

use thiserror::Error;

/// Notification delivery error type
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is absent from a record
    #[error("Missing required field `{field}` in {record} record")]
    MissingField {
        /// Kind of record being read
        record: &'static str,
        /// Field name
        field: &'static str,
    },

    /// A field holds a value of the wrong shape
    #[error("Invalid field `{field}` in {record} record: {message}")]
    InvalidField {
        /// Kind of record being read
        record: &'static str,
        /// Field name
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The record itself is not a JSON object
    #[error("Invalid {record} record: expected a JSON object")]
    InvalidRecord {
        /// Kind of record being read
        record: &'static str,
    },

    /// Notification not present in the collection
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// Action not present on a notification
    #[error("Action '{action}' not found on notification {notification}")]
    ActionNotFound {
        /// Notification id
        notification: String,
        /// Action name
        action: String,
    },

    /// Session store error
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Sled storage error
    #[error("Storage error: {0}")]
    Sled(#[from] sled::Error),
}

impl Error {
    /// Create an invalid field error
    pub fn invalid_field(
        record: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            record,
            field,
            message: message.into(),
        }
    }

    /// Create a session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
