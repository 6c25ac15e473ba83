use crate::error::{InvalidArgumentSnafu, NotFoundSnafu, Result};
use crate::storage::operations::archive::{ArchiveJob, Archiver, FolderArchiver};
use crate::storage::operations::download::archive_name;
use crate::storage::remote::RemoteStorage;
use snafu::{OptionExt, ensure};

/// Trait for compressing a remote folder into a zip stored next to it.
pub trait Compressor {
    /// Archive the whole folder tree and upload it as `<folder name>.zip`
    /// into the folder's parents.
    ///
    /// # Returns
    /// * `Result<String>` - Id of the uploaded archive
    async fn compress(&self, folder_id: &str) -> Result<String>;
}

/// Implementation of Compressor for any [`RemoteStorage`].
pub struct RemoteCompressor<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteCompressor<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: RemoteStorage> Compressor for RemoteCompressor<'_, S> {
    async fn compress(&self, folder_id: &str) -> Result<String> {
        ensure!(
            !folder_id.trim().is_empty(),
            InvalidArgumentSnafu {
                message: "folder id must not be empty".to_string(),
            }
        );
        let folder = self
            .storage
            .get_by_id(folder_id)
            .await?
            .context(NotFoundSnafu {
                id: folder_id.to_string(),
            })?;
        ensure!(
            folder.is_folder(),
            InvalidArgumentSnafu {
                message: format!("'{folder_id}' is not a folder"),
            }
        );

        let bytes = FolderArchiver::new(self.storage)
            .archive(&ArchiveJob::new(folder.id.clone()))
            .await?;
        let zip_name = format!("{}.zip", archive_name(&folder));
        self.storage
            .upload_content(&zip_name, bytes, &folder.parents, None)
            .await
    }
}
