use crate::error::{InvalidArgumentSnafu, NotFoundSnafu, Result};
use crate::storage::entry::RemoteEntry;
use crate::storage::remote::{RemoteStorage, list_all_children};
use crate::storage::utils::size::format_size;
use snafu::{OptionExt, ensure};
use std::fmt;

/// Trait for browsing folders and inspecting entries.
pub trait Lister {
    /// Every child of a folder, all pages fetched, in listing order.
    async fn list(&self, folder_id: &str) -> Result<Vec<RemoteEntry>>;

    /// Look up a single entry by id.
    async fn stat(&self, id: &str) -> Result<RemoteEntry>;
}

/// Implementation of Lister for any [`RemoteStorage`].
pub struct RemoteLister<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteLister<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: RemoteStorage> Lister for RemoteLister<'_, S> {
    async fn list(&self, folder_id: &str) -> Result<Vec<RemoteEntry>> {
        let folder = self.stat(folder_id).await?;
        ensure!(
            folder.is_folder(),
            InvalidArgumentSnafu {
                message: format!("'{folder_id}' is not a folder")
            }
        );
        list_all_children(self.storage, &folder.id).await
    }

    async fn stat(&self, id: &str) -> Result<RemoteEntry> {
        ensure!(
            !id.is_empty(),
            InvalidArgumentSnafu {
                message: "entry id must not be empty".to_string()
            }
        );
        self.storage
            .get_by_id(id)
            .await?
            .context(NotFoundSnafu { id: id.to_string() })
    }
}

/// One line of `ls` output: kind, size, id and display name.
pub struct EntryListing<'a>(pub &'a RemoteEntry);

impl fmt::Display for EntryListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.0;
        if entry.is_folder() {
            write!(f, "DIR  {:>8}  {}  {}", "-", entry.id, entry.file_name())
        } else {
            write!(
                f,
                "FILE {:>8}  {}  {}",
                format_size(entry.size),
                entry.id,
                entry.file_name()
            )
        }
    }
}
