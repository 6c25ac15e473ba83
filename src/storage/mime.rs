//! Bidirectional extension <-> mime lookup.
//!
//! Both directions are built once from [`MIME_TABLE`] and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Mime type the provider uses for folders.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Extension marker used for folders, so `<name><extension>` yields `name/`.
pub const FOLDER_EXTENSION: &str = "/";

/// Fallback mime for extensions missing from the table.
pub const UNKNOWN_MIME: &str = "*/*";

const MIME_TABLE: &[(&str, &str)] = &[
    (FOLDER_EXTENSION, FOLDER_MIME),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".odt", "application/vnd.oasis.opendocument.text"),
    (".rtf", "application/rtf"),
    (".pdf", "application/pdf"),
    (".txt", "text/plain"),
    (".zip", "application/zip"),
    (".epub", "application/epub+zip"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".ods", "application/x-vnd.oasis.opendocument.spreadsheet"),
    (".csv", "text/csv"),
    (".tsv", "text/tab-separated-values"),
    (
        ".pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    (".odp", "application/vnd.oasis.opendocument.presentation"),
    (".jpg", "image/jpeg"),
    (".png", "image/png"),
    (".svg", "image/svg+xml"),
    (".json", "application/vnd.google-apps.script+json"),
];

static MIME_BY_EXTENSION: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MIME_TABLE.iter().copied().collect());

static EXTENSION_BY_MIME: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    MIME_TABLE
        .iter()
        .map(|&(extension, mime)| (mime, extension))
        .collect()
});

/// Mime type for an extension such as `.txt` (case-insensitive).
pub fn mime_for(extension: &str) -> &'static str {
    MIME_BY_EXTENSION
        .get(extension.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(UNKNOWN_MIME)
}

/// Extension (with leading dot) for a mime type, or `""` when unknown.
pub fn extension_for(mime: &str) -> &'static str {
    EXTENSION_BY_MIME.get(mime).copied().unwrap_or("")
}

/// Whether the table knows the extension.
pub fn is_known_extension(extension: &str) -> bool {
    MIME_BY_EXTENSION.contains_key(extension.to_ascii_lowercase().as_str())
}

/// Normalize a user supplied extension filter value: `TXT` and `.txt` both become `.txt`.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().to_ascii_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('.') || trimmed == FOLDER_EXTENSION {
        trimmed
    } else {
        format!(".{trimmed}")
    }
}
