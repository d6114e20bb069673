//! Submitted file payloads
//!
//! A payload describes a file that the multipart layer has already staged in a
//! temporary location. Nothing here touches the filesystem.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Upload status reported by the multipart layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadErrorCode {
    /// File arrived intact
    Ok,
    /// Exceeded the server-wide size limit
    IniSize,
    /// Exceeded the form's declared size limit
    FormSize,
    /// Only part of the file was received
    Partial,
    /// No file was chosen
    NoFile,
    /// No temporary directory to stage into
    NoTmpDir,
    /// Staging write failed
    CantWrite,
    /// An extension stopped the upload
    Extension,
}

impl UploadErrorCode {
    /// Map the conventional numeric code (0..=8, 5 unused)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UploadErrorCode::Ok),
            1 => Some(UploadErrorCode::IniSize),
            2 => Some(UploadErrorCode::FormSize),
            3 => Some(UploadErrorCode::Partial),
            4 => Some(UploadErrorCode::NoFile),
            6 => Some(UploadErrorCode::NoTmpDir),
            7 => Some(UploadErrorCode::CantWrite),
            8 => Some(UploadErrorCode::Extension),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            UploadErrorCode::Ok => 0,
            UploadErrorCode::IniSize => 1,
            UploadErrorCode::FormSize => 2,
            UploadErrorCode::Partial => 3,
            UploadErrorCode::NoFile => 4,
            UploadErrorCode::NoTmpDir => 6,
            UploadErrorCode::CantWrite => 7,
            UploadErrorCode::Extension => 8,
        }
    }
}

/// A staged file as submitted by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// Original client-side filename
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
    /// Where the multipart layer staged the bytes
    pub temp_path: PathBuf,
    pub error: UploadErrorCode,
}

impl UploadPayload {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
        temp_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
            temp_path: temp_path.into(),
            error: UploadErrorCode::Ok,
        }
    }

    pub fn with_error(mut self, error: UploadErrorCode) -> Self {
        self.error = error;
        self
    }

    /// The placeholder a form sends when the file input was left blank
    pub fn no_file() -> Self {
        Self {
            name: String::new(),
            content_type: String::new(),
            size: 0,
            temp_path: PathBuf::new(),
            error: UploadErrorCode::NoFile,
        }
    }

    /// True when no usable file was submitted: nothing chosen, or the transfer failed
    pub fn is_empty(&self) -> bool {
        self.error != UploadErrorCode::Ok
            || self.name.trim().is_empty()
            || self.temp_path.as_os_str().is_empty()
    }

    /// Lowercase extension of the original filename, if any
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// Submitted value for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldInput {
    Upload(UploadPayload),
    Text(String),
}

impl FieldInput {
    pub fn as_upload(&self) -> Option<&UploadPayload> {
        match self {
            FieldInput::Upload(payload) => Some(payload),
            FieldInput::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldInput::Text(text) => Some(text),
            FieldInput::Upload(_) => None,
        }
    }
}

impl From<UploadPayload> for FieldInput {
    fn from(payload: UploadPayload) -> Self {
        FieldInput::Upload(payload)
    }
}

impl From<String> for FieldInput {
    fn from(text: String) -> Self {
        FieldInput::Text(text)
    }
}

impl From<&str> for FieldInput {
    fn from(text: &str) -> Self {
        FieldInput::Text(text.to_string())
    }
}
