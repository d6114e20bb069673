//! Validation pipeline
//!
//! The pipeline knows nothing about uploads. It runs a list of [`ValidatableField`]s
//! against one submission, collects what each field staged into a [`Submission`] and
//! later resolves the column values to persist from it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use filefield_core::{Record, Validation};

/// When a field runs relative to the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationStage {
    /// Ordinary field rules
    Rules,
    /// Side-effecting hooks that must see the rule results first
    AfterRules,
}

/// What a field reported for one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Skipped,
    /// Validation failed with the given reason key
    Rejected(&'static str),
    /// A new column value to persist
    Staged(String),
}

/// A column that takes part in validation
#[async_trait]
pub trait ValidatableField: Send + Sync {
    fn column(&self) -> &str;

    fn stage(&self) -> ValidationStage {
        ValidationStage::Rules
    }

    async fn validate(&self, validation: &mut Validation, record: &dyn Record) -> FieldOutcome;

    /// Value to persist, given what `validate` staged and the current value
    fn save(&self, staged: Option<&str>, current: Option<&str>, _loaded: bool) -> Option<String> {
        staged.or(current).map(str::to_string)
    }
}

/// Per-submission results, handed from `validate` to `save`
#[derive(Debug, Clone, Default)]
pub struct Submission {
    outcomes: Vec<(String, FieldOutcome)>,
}

impl Submission {
    pub fn outcome(&self, column: &str) -> Option<&FieldOutcome> {
        self.outcomes
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, outcome)| outcome)
    }

    pub fn staged(&self, column: &str) -> Option<&str> {
        match self.outcome(column) {
            Some(FieldOutcome::Staged(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &FieldOutcome)> {
        self.outcomes.iter().map(|(c, o)| (c.as_str(), o))
    }
}

/// Ordered set of fields for one model
#[derive(Clone, Default)]
pub struct Pipeline {
    fields: Vec<Arc<dyn ValidatableField>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Arc<dyn ValidatableField>) {
        self.fields.push(field);
    }

    pub fn with_field(mut self, field: Arc<dyn ValidatableField>) -> Self {
        self.push(field);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in execution order: by stage, then declaration order
    fn ordered(&self) -> Vec<&Arc<dyn ValidatableField>> {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_by_key(|field| field.stage());
        fields
    }

    /// Run every field against the submission
    pub async fn validate(&self, validation: &mut Validation, record: &dyn Record) -> Submission {
        let mut submission = Submission::default();

        for field in self.ordered() {
            let outcome = field.validate(validation, record).await;
            submission
                .outcomes
                .push((field.column().to_string(), outcome));
        }

        if validation.has_errors() {
            tracing::debug!(
                errors = validation.errors().len(),
                "Submission failed validation"
            );
        }

        submission
    }

    /// Resolve the column values to persist. `values` holds the current value of
    /// each column (absent means NULL) and is updated in place.
    pub fn save(
        &self,
        submission: &Submission,
        values: &mut HashMap<String, String>,
        record: &dyn Record,
    ) {
        for field in &self.fields {
            let column = field.column();
            let current = values.get(column).map(String::as_str);
            let resolved = field.save(submission.staged(column), current, record.loaded());

            match resolved {
                Some(value) => {
                    values.insert(column.to_string(), value);
                }
                None => {
                    values.remove(column);
                }
            }
        }
    }
}
