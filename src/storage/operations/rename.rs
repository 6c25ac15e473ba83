use crate::error::{InvalidArgumentSnafu, Result};
use crate::storage::entry::RemoteEntry;
use crate::storage::remote::RemoteStorage;
use snafu::ensure;

/// Trait for renaming entries in place.
pub trait Renamer {
    /// Give the entry `id` a new name, keeping its parent folder.
    ///
    /// # Returns
    /// * `Result<RemoteEntry>` - The entry as it looks after the rename
    async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteEntry>;
}

/// Implementation of Renamer for any [`RemoteStorage`].
pub struct RemoteRenamer<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteRenamer<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: RemoteStorage> Renamer for RemoteRenamer<'_, S> {
    async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteEntry> {
        ensure!(
            !id.is_empty(),
            InvalidArgumentSnafu {
                message: "entry id must not be empty".to_string()
            }
        );
        ensure!(
            !new_name.trim().is_empty() && !new_name.contains('/'),
            InvalidArgumentSnafu {
                message: format!("invalid name '{new_name}'")
            }
        );
        let entry = self.storage.update_name(id, new_name.trim()).await?;
        log::info!("renamed {id} to {}", entry.id);
        Ok(entry)
    }
}
