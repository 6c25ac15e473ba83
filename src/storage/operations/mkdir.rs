use crate::error::{InvalidArgumentSnafu, Result};
use crate::storage::mime::FOLDER_MIME;
use crate::storage::remote::RemoteStorage;
use snafu::ensure;

/// Trait for creating folders in storage.
pub trait FolderCreator {
    /// Create a folder named `name` under each of `parents` (the root when empty).
    ///
    /// # Returns
    /// * `Result<String>` - Id of the created folder
    async fn create_folder(&self, name: &str, parents: &[String]) -> Result<String>;
}

/// Implementation of FolderCreator for any [`RemoteStorage`].
pub struct RemoteFolderCreator<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteFolderCreator<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: RemoteStorage> FolderCreator for RemoteFolderCreator<'_, S> {
    async fn create_folder(&self, name: &str, parents: &[String]) -> Result<String> {
        let name = name.trim();
        ensure!(
            !name.is_empty(),
            InvalidArgumentSnafu {
                message: "folder name must not be empty".to_string()
            }
        );
        let id = self.storage.create_entry(name, FOLDER_MIME, parents).await?;
        log::info!("created folder {name} as {id}");
        Ok(id)
    }
}
