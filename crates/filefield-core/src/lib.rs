//! Filefield Core Library
//!
//! This crate provides the configuration, error types, upload payload model and
//! validation context shared by the filefield storage backend and the upload field.

pub mod config;
pub mod error;
pub mod record;
pub mod upload;
pub mod validation;

// Re-export commonly used types
pub use config::{FieldConfig, FieldConfigBuilder, FieldOptions};
pub use error::ConfigError;
pub use record::{Record, RecordState};
pub use upload::{FieldInput, UploadErrorCode, UploadPayload};
pub use validation::{Validation, ValidationErrors};
