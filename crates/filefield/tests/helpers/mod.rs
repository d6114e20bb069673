#![allow(dead_code)]

use async_trait::async_trait;
use filefield::{FieldConfig, StorageError, UploadPayload, UploadStore};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{tempdir, TempDir};

/// Upload directory plus a separate staging area standing in for the multipart temp dir
pub struct Fixture {
    pub uploads: TempDir,
    pub staging: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        Self {
            uploads: tempdir().unwrap(),
            staging: tempdir().unwrap(),
        }
    }

    pub fn config(&self) -> FieldConfig {
        FieldConfig::builder(self.uploads.path().to_string_lossy())
            .build()
            .unwrap()
    }

    /// Write `data` into the staging area and describe it as a submitted file
    pub fn payload(&self, name: &str, content_type: &str, data: &[u8]) -> UploadPayload {
        let temp_path = self
            .staging
            .path()
            .join(format!("php{}", STAGED.fetch_add(1, Ordering::SeqCst)));
        std::fs::write(&temp_path, data).unwrap();
        UploadPayload::new(name, content_type, data.len() as u64, temp_path)
    }

    /// Put an existing file into the upload directory
    pub fn existing(&self, name: &str) -> PathBuf {
        let path = self.uploads.path().join(name);
        std::fs::write(&path, b"previous").unwrap();
        path
    }

    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path()).unwrap().count()
    }
}

static STAGED: AtomicUsize = AtomicUsize::new(0);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Store whose disk is always full
#[derive(Debug, Default)]
pub struct FailingStore {
    pub deletes: AtomicUsize,
}

#[async_trait]
impl UploadStore for FailingStore {
    async fn save(
        &self,
        _payload: &UploadPayload,
        _name: Option<&str>,
        _dir: &Path,
    ) -> Result<PathBuf, StorageError> {
        Err(StorageError::SaveFailed("No space left on device".to_string()))
    }

    async fn delete(&self, _dir: &Path, _name: &str) -> Result<bool, StorageError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }

    async fn exists(&self, _dir: &Path, _name: &str) -> Result<bool, StorageError> {
        Ok(false)
    }
}
