use crate::error::{InvalidArgumentSnafu, NotFoundSnafu, Result};
use crate::storage::constants::ROOT_ARCHIVE_NAME;
use crate::storage::entry::RemoteEntry;
use crate::storage::operations::archive::{ArchiveJob, Archiver, FolderArchiver};
use crate::storage::remote::RemoteStorage;
use snafu::{OptionExt, ensure};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Trait for downloading remote files and folder archives to the local filesystem.
pub trait Downloader {
    /// Download a single file into `local_dir`.
    ///
    /// # Arguments
    /// * `file_id` - Id of the remote file
    /// * `local_dir` - Destination directory, created when missing
    /// * `name` - Local file name; defaults to the remote name with its extension
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the written file
    async fn download_file(
        &self,
        file_id: &str,
        local_dir: &Path,
        name: Option<&str>,
    ) -> Result<PathBuf>;

    /// Archive a folder and save it as `<name>.zip` in `local_dir`.
    ///
    /// # Arguments
    /// * `job` - Archive request, see [`ArchiveJob`]
    /// * `local_dir` - Destination directory, created when missing
    /// * `name` - Archive base name; defaults to the folder name
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the written archive
    async fn download_archive(
        &self,
        job: &ArchiveJob,
        local_dir: &Path,
        name: Option<&str>,
    ) -> Result<PathBuf>;
}

/// Implementation of Downloader for any [`RemoteStorage`].
pub struct RemoteDownloader<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteDownloader<'a, S> {
    /// Create a new downloader over the given storage.
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    async fn resolve(&self, id: &str) -> Result<RemoteEntry> {
        ensure!(
            !id.trim().is_empty(),
            InvalidArgumentSnafu {
                message: "id must not be empty".to_string(),
            }
        );
        self.storage
            .get_by_id(id)
            .await?
            .context(NotFoundSnafu { id: id.to_string() })
    }
}

/// Base name for an archive of `folder`.
pub(crate) fn archive_name(folder: &RemoteEntry) -> &str {
    if folder.name.is_empty() {
        ROOT_ARCHIVE_NAME
    } else {
        &folder.name
    }
}

impl<S: RemoteStorage> Downloader for RemoteDownloader<'_, S> {
    async fn download_file(
        &self,
        file_id: &str,
        local_dir: &Path,
        name: Option<&str>,
    ) -> Result<PathBuf> {
        let entry = self.resolve(file_id).await?;
        ensure!(
            !entry.is_folder(),
            InvalidArgumentSnafu {
                message: format!("'{file_id}' is a folder, download it as an archive"),
            }
        );
        let content = self
            .storage
            .download_content(&entry.id)
            .await?
            .context(NotFoundSnafu { id: entry.id.clone() })?;

        let file_name = name.map(str::to_string).unwrap_or_else(|| entry.file_name());
        let local_path = local_dir.join(file_name);
        fs::create_dir_all(local_dir).await?;
        fs::write(&local_path, &content).await?;
        log::info!(
            "downloaded {} ({} bytes) to {}",
            entry.id,
            content.len(),
            local_path.display()
        );
        Ok(local_path)
    }

    async fn download_archive(
        &self,
        job: &ArchiveJob,
        local_dir: &Path,
        name: Option<&str>,
    ) -> Result<PathBuf> {
        job.validate()?;
        let folder = self.resolve(&job.folder_id).await?;
        let bytes = FolderArchiver::new(self.storage).archive(job).await?;

        let base_name = name.unwrap_or_else(|| archive_name(&folder));
        let local_path = local_dir.join(format!("{base_name}.zip"));
        fs::create_dir_all(local_dir).await?;
        fs::write(&local_path, &bytes).await?;
        log::info!(
            "archived {} ({} bytes) to {}",
            folder.id,
            bytes.len(),
            local_path.display()
        );
        Ok(local_path)
    }
}
