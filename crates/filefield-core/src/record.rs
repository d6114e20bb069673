//! Read-only view of the model being validated

use std::collections::HashMap;

/// What a field hook may ask about the record under validation
pub trait Record: Send + Sync {
    /// Column value as it was loaded from storage, before this submission's changes
    fn original(&self, column: &str) -> Option<&str>;

    /// Whether the record was loaded from storage (an update) rather than being new
    fn loaded(&self) -> bool;
}

/// In-memory record state
#[derive(Debug, Clone, Default)]
pub struct RecordState {
    original: HashMap<String, String>,
    loaded: bool,
}

impl RecordState {
    /// A record that has never been persisted
    pub fn new() -> Self {
        Self::default()
    }

    /// A record loaded from storage with the given column values
    pub fn loaded<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            original: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            loaded: true,
        }
    }
}

impl Record for RecordState {
    fn original(&self, column: &str) -> Option<&str> {
        self.original.get(column).map(String::as_str)
    }

    fn loaded(&self) -> bool {
        self.loaded
    }
}
