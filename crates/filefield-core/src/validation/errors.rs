//! Field-level validation errors keyed by reason

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Declared type is not in the field's allowlist
pub const UPLOAD_TYPE: &str = "upload.type";
/// The upload store refused or failed to persist the file
pub const UPLOAD_SAVE: &str = "upload.save";

/// Ordered field -> reason map.
///
/// Only the first reason per field is kept; a field stops at its first failing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        let field = field.into();
        if self.get(&field).is_some() {
            return;
        }
        self.entries.push((field, reason.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, reason)| reason.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, r)| (f.as_str(), r.as_str()))
    }

    /// Human-readable message per field
    pub fn messages(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(field, reason)| (field.to_string(), message_for(field, reason)))
            .collect()
    }
}

fn message_for(field: &str, reason: &str) -> String {
    match reason {
        UPLOAD_TYPE => format!("{} must be one of the allowed file types", field),
        UPLOAD_SAVE => format!("{} could not be saved", field),
        other => format!("{} is invalid ({})", field, other),
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, reason) in &self.entries {
            map.serialize_entry(field, reason)?;
        }
        map.end()
    }
}
