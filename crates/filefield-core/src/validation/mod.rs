//! Validation modules

pub mod errors;

pub use errors::{ValidationErrors, UPLOAD_SAVE, UPLOAD_TYPE};

use std::collections::HashMap;

use crate::upload::FieldInput;

/// Per-submission validation context
///
/// Holds the submitted input for each field and the errors accumulated so far in
/// this pass. One instance is built per submission and dropped after it.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    data: HashMap<String, FieldInput>,
    errors: ValidationErrors,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, field: impl Into<String>, input: impl Into<FieldInput>) -> Self {
        self.insert(field, input);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, input: impl Into<FieldInput>) {
        self.data.insert(field.into(), input.into());
    }

    /// Submitted input for `field`
    pub fn get(&self, field: &str) -> Option<&FieldInput> {
        self.data.get(field)
    }

    /// Record a failed rule for `field`
    pub fn error(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.add(field, reason);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}
