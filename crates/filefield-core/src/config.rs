//! Configuration module
//!
//! [`FieldOptions`] is the raw, serde-friendly declaration of an upload column as it
//! appears in a schema file or the environment. [`FieldConfig`] is the checked form:
//! its directory exists, is writable, and is stored with forward slashes and exactly
//! one trailing separator.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const WRITE_CHECK_PREFIX: &str = ".filefield-write-check-";

/// Raw upload field options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Directory uploaded files are saved in
    pub path: Option<String>,
    /// Whether the previous file is removed when a new one is persisted
    pub delete_old_file: bool,
    /// Allowed MIME types (`image/png`, `image/*`) or bare extensions (`png`)
    #[serde(alias = "types")]
    pub allowed_types: Vec<String>,
    /// Column default; a file with this name is never garbage collected
    pub default: Option<String>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            path: None,
            delete_old_file: true,
            allowed_types: Vec::new(),
            default: None,
        }
    }
}

impl FieldOptions {
    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from `{PREFIX}PATH`, `{PREFIX}DELETE_OLD_FILE`,
    /// `{PREFIX}ALLOWED_TYPES` (comma separated) and `{PREFIX}DEFAULT`.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(prefix).from_env::<FieldOptions>()?)
    }
}

/// Checked configuration of an upload column
#[derive(Debug, Clone)]
pub struct FieldConfig {
    path: String,
    dir: PathBuf,
    delete_old_file: bool,
    allowed_types: BTreeSet<String>,
    default: Option<String>,
}

impl FieldConfig {
    /// Validate raw options. Fails when the directory is missing, is not a
    /// directory, or cannot be written to.
    pub fn from_options(options: FieldOptions) -> Result<Self, ConfigError> {
        let raw = options.path.as_deref().unwrap_or_default();
        let (dir, path) = check_path(raw)?;

        let allowed_types = options
            .allowed_types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        tracing::debug!(
            path = %path,
            delete_old_file = options.delete_old_file,
            "Upload field configured"
        );

        Ok(FieldConfig {
            path,
            dir,
            delete_old_file: options.delete_old_file,
            allowed_types,
            default: options.default,
        })
    }

    pub fn builder(path: impl Into<String>) -> FieldConfigBuilder {
        FieldConfigBuilder {
            options: FieldOptions {
                path: Some(path.into()),
                ..FieldOptions::default()
            },
        }
    }

    /// Normalized directory, forward slashes, single trailing `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical directory as a filesystem path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn delete_old_file(&self) -> bool {
        self.delete_old_file
    }

    /// Lowercased allowlist; empty means every type is accepted
    pub fn allowed_types(&self) -> &BTreeSet<String> {
        &self.allowed_types
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// Builder for [`FieldConfig`]
#[derive(Debug, Clone)]
pub struct FieldConfigBuilder {
    options: FieldOptions,
}

impl FieldConfigBuilder {
    pub fn delete_old_file(mut self, delete: bool) -> Self {
        self.options.delete_old_file = delete;
        self
    }

    pub fn allow_type(mut self, ty: impl Into<String>) -> Self {
        self.options.allowed_types.push(ty.into());
        self
    }

    pub fn allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options
            .allowed_types
            .extend(types.into_iter().map(Into::into));
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.options.default = Some(default.into());
        self
    }

    pub fn build(self) -> Result<FieldConfig, ConfigError> {
        FieldConfig::from_options(self.options)
    }
}

/// Resolve `raw` to a canonical writable directory and its normalized string form.
fn check_path(raw: &str) -> Result<(PathBuf, String), ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::MissingPath);
    }

    let dir = fs::canonicalize(raw).map_err(|source| ConfigError::NotFound {
        path: PathBuf::from(raw),
        source,
    })?;

    if !dir.is_dir() {
        return Err(ConfigError::NotADirectory(dir));
    }

    // Permission bits lie for root and ACLs; creating a file is the only reliable check.
    tempfile::Builder::new()
        .prefix(WRITE_CHECK_PREFIX)
        .tempfile_in(&dir)
        .map_err(|source| ConfigError::NotWritable {
            path: dir.clone(),
            source,
        })?;

    let path = normalize_dir(&dir.to_string_lossy());
    Ok((dir, path))
}

/// Forward slashes and exactly one trailing separator.
pub fn normalize_dir(path: &str) -> String {
    let path = path.replace('\\', "/");
    format!("{}/", path.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_dir() {
        assert_eq!(normalize_dir("/var/uploads"), "/var/uploads/");
        assert_eq!(normalize_dir("/var/uploads///"), "/var/uploads/");
        assert_eq!(normalize_dir("C:\\data\\uploads\\"), "C:/data/uploads/");
        assert_eq!(normalize_dir("/"), "/");
    }

    #[test]
    fn test_config_from_writable_dir() {
        let dir = tempdir().unwrap();
        let config = FieldConfig::builder(dir.path().to_string_lossy())
            .allow_type(" Image/PNG ")
            .default_value("placeholder.png")
            .build()
            .unwrap();

        assert!(config.path().ends_with('/'));
        assert!(!config.path().ends_with("//"));
        assert!(!config.path().contains('\\'));
        assert!(config.delete_old_file());
        assert!(config.allowed_types().contains("image/png"));
        assert_eq!(config.default_value(), Some("placeholder.png"));

        // The write check must not leave anything behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_trailing_separator_input() {
        let dir = tempdir().unwrap();
        let raw = format!("{}/", dir.path().display());
        let config = FieldConfig::builder(raw).build().unwrap();
        assert!(config.path().ends_with('/'));
        assert!(!config.path().ends_with("//"));
    }

    #[test]
    fn test_missing_path() {
        let result = FieldConfig::from_options(FieldOptions::default());
        assert!(matches!(result, Err(ConfigError::MissingPath)));

        let result = FieldConfig::builder("   ").build();
        assert!(matches!(result, Err(ConfigError::MissingPath)));
    }

    #[test]
    fn test_nonexistent_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let result = FieldConfig::builder(missing.to_string_lossy()).build();
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        let result = FieldConfig::builder(file.to_string_lossy()).build();
        assert!(matches!(result, Err(ConfigError::NotADirectory(_))));
    }

    #[test]
    fn test_options_from_json() {
        let options = FieldOptions::from_json(
            r#"{"path": "/srv/uploads", "types": ["image/png", "jpg"], "default": "none.png"}"#,
        )
        .unwrap();

        assert_eq!(options.path.as_deref(), Some("/srv/uploads"));
        assert!(options.delete_old_file);
        assert_eq!(options.allowed_types, vec!["image/png", "jpg"]);
        assert_eq!(options.default.as_deref(), Some("none.png"));
    }

    #[test]
    fn test_options_from_invalid_json() {
        let result = FieldOptions::from_json(r#"{"delete_old_file": "maybe"}"#);
        assert!(matches!(result, Err(ConfigError::InvalidOptions(_))));
    }
}
