//! Filefield Storage Library
//!
//! This crate provides the upload-save primitive used by the upload field: the
//! [`UploadStore`] trait and a local filesystem implementation.
//!
//! # Name format
//!
//! Names are relative to the target directory and may contain a subpath
//! (`2024/photo.jpg`). They must not be empty, start with `/`, contain a backslash,
//! or contain a `.` or `..` segment. Validation is centralized in the `keys` module
//! so every backend applies the same rules.

pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalUploadStore;
pub use naming::NamingPolicy;
pub use traits::{StorageError, StorageResult, UploadStore};
