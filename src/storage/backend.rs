// RemoteStorage implementation on top of an OpenDAL operator
use crate::error::{InvalidArgumentSnafu, NotFoundSnafu, Result};
use crate::storage::constants::DEFAULT_CHUNK_SIZE;
use crate::storage::entry::{ChildPage, RemoteEntry};
use crate::storage::mime::{self, FOLDER_MIME, UNKNOWN_MIME};
use crate::storage::remote::RemoteStorage;
use crate::storage::utils::path::{
    ROOT_ID, basename, ensure_trailing_slash, extension_of, is_root, join_id, normalize_id,
    parent_id, relative_to,
};
use crate::storage::utils::progress::{ProgressCallback, TransferProgress};
use futures::stream::TryStreamExt;
use opendal::{ErrorKind, Metadata, Operator};
use snafu::{OptionExt, ensure};

/// Storage backend where an entry id is its path inside the operator.
///
/// Folder ids always end with `/` and the root folder is `/`. File names are
/// split into a stem and a known extension, so `docs/report.txt` is reported
/// as `report` with mime `text/plain`.
#[derive(Clone)]
pub struct OpenDalBackend {
    operator: Operator,
    page_size: usize,
}

impl OpenDalBackend {
    /// Create a backend listing at most `page_size` children per page.
    pub fn new(operator: Operator, page_size: usize) -> Self {
        Self {
            operator,
            page_size: page_size.max(1),
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn entry_from(id: &str, meta: &Metadata) -> RemoteEntry {
        let parents: Vec<String> = parent_id(id).into_iter().collect();
        if meta.mode().is_dir() || id.ends_with('/') {
            let id = if is_root(id) {
                ROOT_ID.to_string()
            } else {
                ensure_trailing_slash(id)
            };
            let name = basename(&id);
            RemoteEntry::folder(id, name, parents)
        } else {
            let (name, mime_type) = split_name(&basename(id));
            RemoteEntry::file(id, name, mime_type, parents, meta.content_length())
        }
    }

    /// Stat an id, retrying with a trailing '/' so callers may omit it for folders.
    async fn stat_entry(&self, id: &str) -> Result<Option<RemoteEntry>> {
        let id = normalize_id(id);
        match self.operator.stat(&id).await {
            Ok(meta) => Ok(Some(Self::entry_from(&id, &meta))),
            Err(e) if e.kind() == ErrorKind::NotFound && !id.ends_with('/') => {
                let dir_id = ensure_trailing_slash(&id);
                match self.operator.stat(&dir_id).await {
                    Ok(meta) if meta.mode().is_dir() => {
                        Ok(Some(Self::entry_from(&dir_id, &meta)))
                    }
                    Ok(_) => Ok(None),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the parent folders for a create/upload, defaulting to the root.
    async fn resolve_parents(&self, parents: &[String]) -> Result<Vec<String>> {
        if parents.is_empty() {
            return Ok(vec![ROOT_ID.to_string()]);
        }
        let mut resolved = Vec::with_capacity(parents.len());
        for parent in parents {
            let entry = self
                .stat_entry(parent)
                .await?
                .context(NotFoundSnafu { id: parent.clone() })?;
            ensure!(
                entry.is_folder(),
                InvalidArgumentSnafu {
                    message: format!("parent '{parent}' is not a folder"),
                }
            );
            resolved.push(entry.id);
        }
        Ok(resolved)
    }

    /// Write a file in chunks, reporting progress after every chunk.
    async fn write_with_progress(
        &self,
        path: &str,
        name: &str,
        content: &[u8],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<()> {
        let mime_type = mime::mime_for(extension_of(name));
        let capability = self.operator.info().full_capability();
        let mut writer = if capability.write_with_content_type && mime_type != UNKNOWN_MIME {
            self.operator
                .writer_with(path)
                .content_type(mime_type)
                .await?
        } else {
            self.operator.writer(path).await?
        };

        let total = content.len() as u64;
        let mut done = 0u64;
        for chunk in content.chunks(DEFAULT_CHUNK_SIZE) {
            writer.write(chunk.to_vec()).await?;
            done += chunk.len() as u64;
            if let Some(callback) = progress {
                callback(&TransferProgress::new(name, done, total));
            }
        }
        writer.close().await?;

        if total == 0 {
            if let Some(callback) = progress {
                callback(&TransferProgress::new(name, 0, 0));
            }
        }
        Ok(())
    }

    /// Move a single file, using native rename when the service has it.
    async fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let capability = self.operator.info().full_capability();
        if capability.rename {
            self.operator.rename(from, to).await?;
        } else if capability.copy {
            self.operator.copy(from, to).await?;
            self.operator.delete(from).await?;
        } else {
            let data = self.operator.read(from).await?;
            self.operator.write(to, data).await?;
            self.operator.delete(from).await?;
        }
        Ok(())
    }

    /// Move a folder and every descendant below a new prefix.
    async fn move_folder(&self, from: &str, to: &str) -> Result<()> {
        let mut descendants = Vec::new();
        let mut lister = self.operator.lister_with(from).recursive(true).await?;
        while let Some(entry) = lister.try_next().await? {
            let path = normalize_id(entry.path());
            if path == from {
                continue;
            }
            descendants.push((path, entry.metadata().mode().is_dir()));
        }
        descendants.sort();

        self.operator.create_dir(to).await?;
        for (path, is_dir) in &descendants {
            let target = format!("{to}{}", relative_to(path, from));
            if *is_dir {
                self.operator.create_dir(&ensure_trailing_slash(&target)).await?;
            } else {
                self.move_file(path, &target).await?;
            }
        }
        self.operator.remove_all(from).await?;
        Ok(())
    }
}

impl RemoteStorage for OpenDalBackend {
    async fn get_by_id(&self, id: &str) -> Result<Option<RemoteEntry>> {
        self.stat_entry(id).await
    }

    async fn list_children(&self, folder_id: &str, page_token: Option<&str>) -> Result<ChildPage> {
        let folder = normalize_id(folder_id);
        let folder = if is_root(&folder) {
            ROOT_ID.to_string()
        } else {
            ensure_trailing_slash(&folder)
        };

        // Services that resume after a key skip the pages already handed out.
        let resume = self.operator.info().full_capability().list_with_start_after;
        let listed = match page_token {
            Some(token) if resume => {
                self.operator
                    .list_with(&folder)
                    .start_after(token)
                    .await?
            }
            _ => self.operator.list(&folder).await?,
        };

        let mut children: Vec<(String, Metadata)> = listed
            .into_iter()
            .map(|entry| (normalize_id(entry.path()), entry.metadata().clone()))
            .filter(|(id, _)| *id != folder)
            .collect();
        children.sort_by(|a, b| a.0.cmp(&b.0));

        let start = match page_token {
            Some(token) => children.partition_point(|(id, _)| id.as_str() <= token),
            None => 0,
        };
        let end = (start + self.page_size).min(children.len());
        let next_page_token = if end < children.len() {
            Some(children[end - 1].0.clone())
        } else {
            None
        };

        let mut entries = Vec::with_capacity(end - start);
        for (id, meta) in children.drain(start..end) {
            // Some services omit sizes in listings.
            if meta.mode().is_file() && meta.content_length() == 0 {
                let meta = self.operator.stat(&id).await?;
                entries.push(Self::entry_from(&id, &meta));
            } else {
                entries.push(Self::entry_from(&id, &meta));
            }
        }

        Ok(ChildPage {
            entries,
            next_page_token,
        })
    }

    async fn download_content(&self, file_id: &str) -> Result<Option<Vec<u8>>> {
        let id = normalize_id(file_id);
        match self.operator.read(&id).await {
            Ok(buffer) => Ok(Some(buffer.to_vec())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("download skipped, '{id}' no longer exists");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_entry(&self, name: &str, mime_type: &str, parents: &[String]) -> Result<String> {
        validate_name(name)?;
        let parents = self.resolve_parents(parents).await?;
        let file_name = format!("{name}{}", mime::extension_for(mime_type));

        let mut created = Vec::with_capacity(parents.len());
        for parent in &parents {
            let id = join_id(parent, &file_name);
            if mime_type == FOLDER_MIME {
                self.operator.create_dir(&id).await?;
            } else {
                self.operator.write(&id, Vec::<u8>::new()).await?;
            }
            created.push(id);
        }
        first_id(created)
    }

    async fn update_name(&self, id: &str, new_name: &str) -> Result<RemoteEntry> {
        validate_name(new_name)?;
        let entry = self
            .stat_entry(id)
            .await?
            .context(NotFoundSnafu { id: id.to_string() })?;
        let parent = parent_id(&entry.id).context(InvalidArgumentSnafu {
            message: "the storage root cannot be renamed".to_string(),
        })?;

        let target = if entry.is_folder() {
            ensure_trailing_slash(&join_id(&parent, new_name))
        } else {
            join_id(&parent, new_name)
        };
        if target == entry.id {
            return Ok(entry);
        }
        ensure!(
            self.stat_entry(&target).await?.is_none(),
            InvalidArgumentSnafu {
                message: format!("'{target}' already exists"),
            }
        );

        if entry.is_folder() {
            self.move_folder(&entry.id, &target).await?;
        } else {
            self.move_file(&entry.id, &target).await?;
        }

        self.stat_entry(&target)
            .await?
            .context(NotFoundSnafu { id: target.clone() })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let entry = self
            .stat_entry(id)
            .await?
            .context(NotFoundSnafu { id: id.to_string() })?;
        ensure!(
            !is_root(&entry.id),
            InvalidArgumentSnafu {
                message: "refusing to delete the storage root".to_string(),
            }
        );

        if entry.is_folder() {
            self.operator.remove_all(&entry.id).await?;
        } else {
            self.operator.delete(&entry.id).await?;
        }
        Ok(())
    }

    async fn upload_content(
        &self,
        name: &str,
        content: Vec<u8>,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String> {
        validate_name(name)?;
        let parents = self.resolve_parents(parents).await?;

        let mut created = Vec::with_capacity(parents.len());
        for parent in &parents {
            let id = join_id(parent, name);
            self.write_with_progress(&id, name, &content, progress)
                .await?;
            created.push(id);
        }
        first_id(created)
    }
}

fn validate_name(name: &str) -> Result<()> {
    ensure!(
        !name.trim().is_empty(),
        InvalidArgumentSnafu {
            message: "name must not be empty".to_string(),
        }
    );
    ensure!(
        !name.contains('/'),
        InvalidArgumentSnafu {
            message: format!("name '{name}' must not contain '/'"),
        }
    );
    Ok(())
}

fn first_id(ids: Vec<String>) -> Result<String> {
    ids.into_iter().next().context(InvalidArgumentSnafu {
        message: "no parent folder to create the entry in".to_string(),
    })
}

/// Split a base name into display name and mime type.
fn split_name(base: &str) -> (String, &'static str) {
    let extension = extension_of(base);
    if !extension.is_empty() && mime::is_known_extension(extension) {
        let stem = &base[..base.len() - extension.len()];
        (stem.to_string(), mime::mime_for(extension))
    } else {
        (base.to_string(), UNKNOWN_MIME)
    }
}
