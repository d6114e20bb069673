//! Allowed-type checks for submitted files

use std::collections::BTreeSet;

use filefield_core::UploadPayload;

/// Lowercased media type of a `Content-Type` value, with anything after `;` dropped.
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Whether `payload` matches the allowlist.
///
/// Entries containing `/` are MIME types (`image/*` accepts any image subtype); other
/// entries are file extensions checked against the original filename. An empty list
/// accepts everything. `allowed` must already be lowercased.
pub fn is_allowed(allowed: &BTreeSet<String>, payload: &UploadPayload) -> bool {
    if allowed.is_empty() {
        return true;
    }

    let mime = normalize_mime_type(&payload.content_type);
    let extension = payload.extension();

    allowed.iter().any(|entry| match entry.split_once('/') {
        Some((top, "*")) => mime
            .split_once('/')
            .is_some_and(|(mime_top, _)| mime_top == top),
        Some(_) => *entry == mime,
        None => extension.as_deref() == Some(entry.trim_start_matches('.')),
    })
}
