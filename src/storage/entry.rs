use crate::storage::mime::{self, FOLDER_MIME};
use serde::Serialize;

/// A file or folder as represented by the storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub id: String,
    /// Display name without the extension implied by `mime_type`.
    ///
    /// Known extensions are matched case-insensitively and rebuilt from the
    /// mime table, so a stored `Data.CSV` has name `Data` and
    /// [`file_name`](Self::file_name) `Data.csv`. The `id` keeps the original
    /// casing. Unknown extensions stay part of the name verbatim.
    pub name: String,
    pub mime_type: String,
    pub parents: Vec<String>,
    pub size: u64,
}

impl RemoteEntry {
    pub fn folder(id: impl Into<String>, name: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: FOLDER_MIME.to_string(),
            parents,
            size: 0,
        }
    }

    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        parents: Vec<String>,
        size: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            parents,
            size,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }

    /// Extension derived from the mime type: `/` for folders, `""` when unknown.
    pub fn extension(&self) -> &'static str {
        mime::extension_for(&self.mime_type)
    }

    /// Name as it appears on disk or inside an archive.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.extension())
    }
}

/// One page of a folder listing.
#[derive(Debug, Clone, Default)]
pub struct ChildPage {
    pub entries: Vec<RemoteEntry>,
    /// Continuation token; `None` on the last page.
    pub next_page_token: Option<String>,
}
