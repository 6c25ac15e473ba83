use crate::error::{DirectoryUploadNotRecursiveSnafu, PathNotFoundSnafu, Result};
use crate::storage::mime::FOLDER_MIME;
use crate::storage::remote::RemoteStorage;
use crate::storage::utils::progress::ProgressCallback;
use async_recursion::async_recursion;
use futures::future::try_join_all;
use snafu::ensure;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Trait for uploading local files and directories to storage.
pub trait Uploader {
    /// Upload a single local file under `parents`.
    ///
    /// # Arguments
    /// * `local_path` - Source file on the local filesystem
    /// * `parents` - Remote parent folder ids (the root when empty)
    /// * `progress` - Optional observer for transfer progress
    ///
    /// # Returns
    /// * `Result<String>` - Id of the uploaded file
    async fn upload_file(
        &self,
        local_path: &Path,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String>;

    /// Upload several independent files concurrently; the first failure fails the batch.
    async fn upload_files(
        &self,
        local_paths: &[PathBuf],
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<Vec<String>>;

    /// Recreate a local directory tree remotely and return the new folder id.
    async fn upload_folder(
        &self,
        local_path: &Path,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String>;
}

/// Implementation of Uploader for any [`RemoteStorage`].
pub struct RemoteUploader<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteUploader<'a, S> {
    /// Create a new uploader over the given storage.
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

/// A local directory tree flattened in pre-order, paths relative to its root.
#[derive(Debug, PartialEq, Eq)]
enum LocalItem {
    Folder(PathBuf),
    File(PathBuf),
}

/// Walk a local directory, parents before children, siblings sorted by name.
#[async_recursion]
async fn collect_local_tree(root: PathBuf, relative: PathBuf) -> Result<Vec<LocalItem>> {
    let mut children = Vec::new();
    let mut entries = fs::read_dir(root.join(&relative)).await?;
    while let Some(entry) = entries.next_entry().await? {
        children.push((entry.file_name(), entry.file_type().await?.is_dir()));
    }
    children.sort();

    let mut items = Vec::new();
    for (name, is_dir) in children {
        let child = relative.join(name);
        if is_dir {
            items.push(LocalItem::Folder(child.clone()));
            items.extend(collect_local_tree(root.clone(), child).await?);
        } else {
            items.push(LocalItem::File(child));
        }
    }
    Ok(items)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl<S: RemoteStorage> Uploader for RemoteUploader<'_, S> {
    async fn upload_file(
        &self,
        local_path: &Path,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String> {
        ensure!(
            local_path.exists(),
            PathNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );
        ensure!(!local_path.is_dir(), DirectoryUploadNotRecursiveSnafu);

        let content = fs::read(local_path).await?;
        let name = file_name_of(local_path);
        let id = self
            .storage
            .upload_content(&name, content, parents, progress)
            .await?;
        log::info!("uploaded {} as {id}", local_path.display());
        Ok(id)
    }

    async fn upload_files(
        &self,
        local_paths: &[PathBuf],
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<Vec<String>> {
        try_join_all(
            local_paths
                .iter()
                .map(|path| self.upload_file(path, parents, progress)),
        )
        .await
    }

    async fn upload_folder(
        &self,
        local_path: &Path,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String> {
        ensure!(
            local_path.is_dir(),
            PathNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );

        let root_id = self
            .storage
            .create_entry(&file_name_of(local_path), FOLDER_MIME, parents)
            .await?;
        let items = collect_local_tree(local_path.to_path_buf(), PathBuf::new()).await?;

        let mut folder_ids: HashMap<PathBuf, String> = HashMap::new();
        folder_ids.insert(PathBuf::new(), root_id.clone());
        for item in items {
            let relative = match &item {
                LocalItem::Folder(relative) | LocalItem::File(relative) => relative,
            };
            let parent_key = relative.parent().map(Path::to_path_buf).unwrap_or_default();
            let parent = vec![
                folder_ids
                    .get(&parent_key)
                    .cloned()
                    .unwrap_or_else(|| root_id.clone()),
            ];
            match item {
                LocalItem::Folder(relative) => {
                    let id = self
                        .storage
                        .create_entry(&file_name_of(&relative), FOLDER_MIME, &parent)
                        .await?;
                    folder_ids.insert(relative, id);
                }
                LocalItem::File(relative) => {
                    self.upload_file(&local_path.join(&relative), &parent, progress)
                        .await?;
                }
            }
        }
        Ok(root_id)
    }
}
