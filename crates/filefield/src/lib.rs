//! Filefield
//!
//! A file upload column for ORM models. When a record is validated the field checks
//! the submitted file's type, sanitizes its name, moves it into the configured
//! directory and removes the file it replaces. The filename relative to that
//! directory is what ends up stored in the column.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use filefield::{Pipeline, UploadField, Validation, RecordState, FieldConfig};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let config = FieldConfig::builder("/srv/uploads")
//!     .allow_type("image/png")
//!     .default_value("placeholder.png")
//!     .build()?;
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.push(Arc::new(UploadField::new("avatar", config)));
//!
//! let record = RecordState::loaded([("avatar", "old.png")]);
//! let mut validation = Validation::new();
//! let submission = pipeline.validate(&mut validation, &record).await;
//!
//! let mut values = HashMap::from([("avatar".to_string(), "old.png".to_string())]);
//! pipeline.save(&submission, &mut values, &record);
//! # Ok(())
//! # }
//! ```

pub mod field;
pub mod pipeline;
pub mod sanitize;
pub mod types;

pub use field::{PersistedFilename, UploadField, UploadOutcome};
pub use pipeline::{FieldOutcome, Pipeline, Submission, ValidatableField, ValidationStage};
pub use sanitize::sanitize_filename;

pub use filefield_core::{
    ConfigError, FieldConfig, FieldInput, FieldOptions, Record, RecordState, UploadErrorCode,
    UploadPayload, Validation, ValidationErrors,
};
pub use filefield_storage::{LocalUploadStore, NamingPolicy, StorageError, UploadStore};
