//! Upload store abstraction trait
//!
//! This module defines the UploadStore trait that every upload-save backend implements.

use async_trait::async_trait;
use filefield_core::UploadPayload;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Upload-save primitive
///
/// Moves staged uploads into a directory and removes files from it. Collision
/// handling is owned by the implementation: two saves under the same name never
/// overwrite each other.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist `payload` into `dir` and return the absolute path it was saved at.
    ///
    /// `name` overrides the payload's own filename. The final name may differ from
    /// the requested one when the implementation disambiguates a clash.
    async fn save(
        &self,
        payload: &UploadPayload,
        name: Option<&str>,
        dir: &Path,
    ) -> StorageResult<PathBuf>;

    /// Delete `name` relative to `dir`. Returns `false` when nothing existed there.
    async fn delete(&self, dir: &Path, name: &str) -> StorageResult<bool>;

    /// Check if a file exists at `name` relative to `dir`
    async fn exists(&self, dir: &Path, name: &str) -> StorageResult<bool>;
}
