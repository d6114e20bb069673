//! The upload column
//!
//! [`UploadField`] runs once per validation pass. Its outcome is returned to the
//! caller rather than cached on the field, so a filename staged for one submission
//! can never be written by an unrelated save.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use filefield_core::validation::{UPLOAD_SAVE, UPLOAD_TYPE};
use filefield_core::{ConfigError, FieldConfig, FieldOptions, Record, Validation};
use filefield_storage::{LocalUploadStore, UploadStore};

use crate::pipeline::{FieldOutcome, ValidatableField, ValidationStage};
use crate::sanitize::sanitize_filename;
use crate::types::is_allowed;

/// Saved filename relative to the field's directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PersistedFilename(String);

impl PersistedFilename {
    /// Derive the column value from the absolute path the store reported.
    ///
    /// Backslashes become `/`, the directory prefix `dir` (normalized, with its
    /// trailing `/`) is removed and separators at either end are trimmed.
    pub fn from_saved_path(saved: &Path, dir: &str) -> Self {
        let saved = saved.to_string_lossy().replace('\\', "/");
        let relative = saved.strip_prefix(dir).unwrap_or(saved.as_str());
        PersistedFilename(relative.trim_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PersistedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one validation pass for an upload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No new file, or the submission was already failing
    Skipped,
    /// Declared type is not allowed; `upload.type` was recorded
    TypeRejected,
    /// The store could not persist the file; `upload.save` was recorded
    SaveFailed,
    /// File saved; the column should now hold this name
    Persisted(PersistedFilename),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Persisted(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UploadOutcome::TypeRejected | UploadOutcome::SaveFailed)
    }

    pub fn filename(&self) -> Option<&PersistedFilename> {
        match self {
            UploadOutcome::Persisted(filename) => Some(filename),
            _ => None,
        }
    }
}

impl From<UploadOutcome> for FieldOutcome {
    fn from(outcome: UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Skipped => FieldOutcome::Skipped,
            UploadOutcome::TypeRejected => FieldOutcome::Rejected(UPLOAD_TYPE),
            UploadOutcome::SaveFailed => FieldOutcome::Rejected(UPLOAD_SAVE),
            UploadOutcome::Persisted(filename) => FieldOutcome::Staged(filename.into_string()),
        }
    }
}

/// File upload column
#[derive(Clone)]
pub struct UploadField {
    column: String,
    config: FieldConfig,
    store: Arc<dyn UploadStore>,
}

impl fmt::Debug for UploadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadField")
            .field("column", &self.column)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UploadField {
    /// Create a field that saves through the local filesystem store
    pub fn new(column: impl Into<String>, config: FieldConfig) -> Self {
        Self {
            column: column.into(),
            config,
            store: Arc::new(LocalUploadStore::new()),
        }
    }

    /// Check raw options and build the field. Fails when the directory is unusable.
    pub fn configure(column: impl Into<String>, options: FieldOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(column, FieldConfig::from_options(options)?))
    }

    pub fn with_store(mut self, store: Arc<dyn UploadStore>) -> Self {
        self.store = store;
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Handle the upload submitted under `field`.
    ///
    /// Must run after the ordinary field rules: an already failing submission is
    /// skipped without touching the filesystem.
    pub async fn on_validate(
        &self,
        validation: &mut Validation,
        record: &dyn Record,
        field: &str,
    ) -> UploadOutcome {
        if validation.has_errors() {
            tracing::debug!(field = %field, "Submission already invalid, upload skipped");
            return UploadOutcome::Skipped;
        }

        let Some(payload) = validation.get(field).and_then(|input| input.as_upload()) else {
            tracing::debug!(field = %field, "No upload submitted");
            return UploadOutcome::Skipped;
        };

        if payload.is_empty() {
            tracing::debug!(
                field = %field,
                error_code = payload.error.code(),
                "Empty upload skipped"
            );
            return UploadOutcome::Skipped;
        }

        if !is_allowed(self.config.allowed_types(), payload) {
            tracing::debug!(
                field = %field,
                content_type = %payload.content_type,
                "Upload type not allowed"
            );
            validation.error(field, UPLOAD_TYPE);
            return UploadOutcome::TypeRejected;
        }

        let name = sanitize_filename(&payload.name);

        let saved = match self.store.save(payload, Some(&name), self.config.dir()).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(
                    field = %field,
                    name = %name,
                    error = %e,
                    "Upload could not be saved"
                );
                validation.error(field, UPLOAD_SAVE);
                return UploadOutcome::SaveFailed;
            }
        };

        let filename = PersistedFilename::from_saved_path(&saved, self.config.path());

        // A store that reuses names could hand back the previous file's own name
        let previous = record
            .original(&self.column)
            .filter(|previous| *previous != filename.as_str());
        self.delete_old_file(previous).await;

        tracing::info!(
            column = %self.column,
            filename = %filename,
            "Upload persisted"
        );

        UploadOutcome::Persisted(filename)
    }

    /// Value to write into the column: the staged filename if this submission
    /// persisted one, otherwise the current value unchanged.
    pub fn on_save(
        &self,
        staged: Option<&str>,
        current: Option<&str>,
        _loaded: bool,
    ) -> Option<String> {
        staged.or(current).map(str::to_string)
    }

    /// Remove the file `previous` refers to. Best effort: failures are logged and
    /// swallowed. Returns whether a file was removed.
    ///
    /// Files still referenced by other records are not detected.
    pub async fn delete_old_file(&self, previous: Option<&str>) -> bool {
        if !self.config.delete_old_file() {
            return false;
        }

        let Some(previous) = previous.filter(|p| !p.is_empty()) else {
            return false;
        };

        if Some(previous) == self.config.default_value() {
            tracing::debug!(
                column = %self.column,
                filename = %previous,
                "Previous value is the column default, keeping it"
            );
            return false;
        }

        match self.store.delete(self.config.dir(), previous).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(
                    column = %self.column,
                    filename = %previous,
                    error = %e,
                    "Failed to delete old upload"
                );
                false
            }
        }
    }
}

#[async_trait]
impl ValidatableField for UploadField {
    fn column(&self) -> &str {
        &self.column
    }

    fn stage(&self) -> ValidationStage {
        ValidationStage::AfterRules
    }

    async fn validate(&self, validation: &mut Validation, record: &dyn Record) -> FieldOutcome {
        self.on_validate(validation, record, &self.column).await.into()
    }

    fn save(&self, staged: Option<&str>, current: Option<&str>, loaded: bool) -> Option<String> {
        self.on_save(staged, current, loaded)
    }
}
