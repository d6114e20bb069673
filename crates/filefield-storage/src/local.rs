use crate::keys::name_to_path;
use crate::naming::NamingPolicy;
use crate::traits::{StorageError, StorageResult, UploadStore};
use async_trait::async_trait;
use filefield_core::UploadPayload;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const MAX_NAME_ATTEMPTS: u32 = 1000;
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Local filesystem upload store
#[derive(Clone, Debug)]
pub struct LocalUploadStore {
    naming: NamingPolicy,
    file_mode: Option<u32>,
}

impl Default for LocalUploadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalUploadStore {
    /// Create a store that disambiguates clashing names and saves files as `0644`
    pub fn new() -> Self {
        Self {
            naming: NamingPolicy::default(),
            file_mode: Some(DEFAULT_FILE_MODE),
        }
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Unix permission bits applied to saved files; `None` keeps whatever the move produced
    pub fn with_file_mode(mut self, mode: Option<u32>) -> Self {
        self.file_mode = mode;
        self
    }

    async fn ensure_dir(dir: &Path) -> StorageResult<()> {
        match fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::DirectoryUnavailable(format!(
                "{} is not a directory",
                dir.display()
            ))),
            Err(e) => Err(StorageError::DirectoryUnavailable(format!(
                "{}: {}",
                dir.display(),
                e
            ))),
        }
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Create an empty file at the first free candidate name so concurrent saves
    /// never pick the same target.
    async fn reserve(&self, dir: &Path, name: &str) -> StorageResult<PathBuf> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = self.naming.candidate(name, attempt);
            let path = name_to_path(dir, &candidate)?;
            self.ensure_parent_dir(&path).await?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::SaveFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        Err(StorageError::SaveFailed(format!(
            "No free name for {} after {} attempts",
            name, MAX_NAME_ATTEMPTS
        )))
    }

    /// Move the staged file onto `target`, copying when a rename is not possible
    /// (for example across filesystems).
    async fn move_staged(&self, staged: &Path, target: &Path) -> StorageResult<()> {
        if fs::rename(staged, target).await.is_ok() {
            return Ok(());
        }

        fs::copy(staged, target).await.map_err(|e| {
            StorageError::SaveFailed(format!(
                "Failed to copy {} to {}: {}",
                staged.display(),
                target.display(),
                e
            ))
        })?;

        if let Err(e) = fs::remove_file(staged).await {
            tracing::warn!(
                staged = %staged.display(),
                error = %e,
                "Failed to remove staged upload after copy"
            );
        }

        Ok(())
    }

    /// Undo a move whose follow-up step failed: the staged file goes back where it was,
    /// and nothing is left under the target name.
    async fn roll_back(staged: &Path, target: &Path) {
        if fs::rename(target, staged).await.is_ok() {
            return;
        }

        if let Err(e) = fs::remove_file(target).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    path = %target.display(),
                    error = %e,
                    "Failed to remove upload after a failed save"
                );
            }
        }
    }

    #[cfg(unix)]
    async fn apply_mode(&self, path: &Path) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;

        if let Some(mode) = self.file_mode {
            fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn apply_mode(&self, _path: &Path) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(
        &self,
        payload: &UploadPayload,
        name: Option<&str>,
        dir: &Path,
    ) -> StorageResult<PathBuf> {
        let start = std::time::Instant::now();
        let name = name.unwrap_or(&payload.name);

        Self::ensure_dir(dir).await?;

        if !fs::try_exists(&payload.temp_path).await.unwrap_or(false) {
            return Err(StorageError::SaveFailed(format!(
                "Staged upload {} is missing",
                payload.temp_path.display()
            )));
        }

        let target = self.reserve(dir, name).await?;

        if let Err(e) = self.move_staged(&payload.temp_path, &target).await {
            let _ = fs::remove_file(&target).await;
            return Err(e);
        }

        if let Err(e) = self.apply_mode(&target).await {
            Self::roll_back(&payload.temp_path, &target).await;
            return Err(e);
        }

        tracing::info!(
            path = %target.display(),
            requested_name = %name,
            size_bytes = payload.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload save successful"
        );

        Ok(target)
    }

    async fn delete(&self, dir: &Path, name: &str) -> StorageResult<bool> {
        let path = name_to_path(dir, name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Local upload delete successful");

        Ok(true)
    }

    async fn exists(&self, dir: &Path, name: &str) -> StorageResult<bool> {
        let path = name_to_path(dir, name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
