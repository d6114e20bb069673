//! Shared name validation for upload stores.

use crate::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Validate a relative name and join it onto `dir`.
///
/// Rejects names that could resolve outside `dir`.
pub fn name_to_path(dir: &Path, name: &str) -> StorageResult<PathBuf> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("File name is empty".to_string()));
    }

    if name.starts_with('/') || name.contains('\\') || name.contains('\0') {
        return Err(StorageError::InvalidName(format!(
            "File name contains invalid characters: {}",
            name
        )));
    }

    if name
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidName(format!(
            "File name contains an invalid path segment: {}",
            name
        )));
    }

    Ok(dir.join(name))
}
