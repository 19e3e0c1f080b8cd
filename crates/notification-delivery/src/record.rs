//! Lenient readers for loosely-typed JSON records
//!
//! Records arrive from session queues, live events and broadcast payloads, so
//! every field is optional on input and scalar types are coerced where the
//! intent is unambiguous. Anything else is reported as an invalid field.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Read-only view over a JSON object record
pub(crate) struct RecordReader<'a> {
    kind: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> RecordReader<'a> {
    /// Wrap a record, rejecting anything that is not an object
    pub(crate) fn new(kind: &'static str, record: &'a Value) -> Result<Self> {
        match record {
            Value::Object(fields) => Ok(Self { kind, fields }),
            _ => Err(Error::InvalidRecord { record: kind }),
        }
    }

    /// Whether the key is present, even if null
    pub(crate) fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Raw value, with explicit nulls folded into absence
    pub(crate) fn value(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    /// String that must be present; an empty string still counts
    pub(crate) fn required_str(&self, field: &'static str) -> Result<String> {
        match self.optional_str(field)? {
            Some(value) => Ok(value),
            None => Err(Error::MissingField {
                record: self.kind,
                field,
            }),
        }
    }

    /// Optional string, numbers are coerced to their decimal form
    pub(crate) fn optional_str(&self, field: &'static str) -> Result<Option<String>> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(Value::Number(value)) => Ok(Some(value.to_string())),
            Some(other) => Err(self.invalid(field, format!("expected a string, got {other}"))),
        }
    }

    /// Optional string that counts only when it has visible content
    pub(crate) fn filled_str(&self, field: &'static str) -> Result<Option<String>> {
        Ok(self
            .optional_str(field)?
            .filter(|value| !value.trim().is_empty()))
    }

    /// Boolean flag, absent means false
    pub(crate) fn flag(&self, field: &'static str) -> Result<bool> {
        match self.value(field) {
            None => Ok(false),
            Some(value) => coerce_flag(value)
                .ok_or_else(|| self.invalid(field, format!("expected a boolean, got {value}"))),
        }
    }

    /// String to string mapping, absent means empty
    pub(crate) fn string_map(&self, field: &'static str) -> Result<BTreeMap<String, String>> {
        let Some(value) = self.value(field) else {
            return Ok(BTreeMap::new());
        };

        match value {
            Value::Object(entries) => entries
                .iter()
                .map(|(key, value)| match value {
                    Value::String(text) => Ok((key.clone(), text.clone())),
                    Value::Number(number) => Ok((key.clone(), number.to_string())),
                    Value::Bool(flag) => Ok((key.clone(), flag.to_string())),
                    other => Err(self.invalid(
                        field,
                        format!("attribute `{key}` must be a scalar, got {other}"),
                    )),
                })
                .collect(),
            // An empty list is how some producers encode an empty mapping
            Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
            other => Err(self.invalid(field, format!("expected a mapping, got {other}"))),
        }
    }

    /// JSON object, absent means empty
    pub(crate) fn object(&self, field: &'static str) -> Result<Map<String, Value>> {
        match self.value(field) {
            None => Ok(Map::new()),
            Some(Value::Object(entries)) => Ok(entries.clone()),
            Some(Value::Array(items)) if items.is_empty() => Ok(Map::new()),
            Some(other) => Err(self.invalid(field, format!("expected a mapping, got {other}"))),
        }
    }

    /// JSON array, absent means empty
    pub(crate) fn array(&self, field: &'static str) -> Result<&'a [Value]> {
        match self.value(field) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(self.invalid(field, format!("expected a list, got {other}"))),
        }
    }

    fn invalid(&self, field: &'static str, message: String) -> Error {
        Error::invalid_field(self.kind, field, message)
    }
}

/// Interpret a scalar as a boolean the way form and queue payloads encode them
pub(crate) fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "" | "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        Value::Array(_) | Value::Object(_) => None,
    }
}
