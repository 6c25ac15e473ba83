use crate::error::{InvalidArgumentSnafu, NotFoundSnafu, Result};
use crate::storage::constants::UNBOUNDED_DEPTH;
use crate::storage::entry::RemoteEntry;
use crate::storage::mime::normalize_extension;
use crate::storage::remote::{RemoteStorage, list_all_children};
use crate::storage::utils::path::extension_of;
use futures::future::BoxFuture;
use snafu::{OptionExt, ensure};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// How the remaining depth is spent while descending into subfolders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthBudget {
    /// One counter per folder level, decremented for every subfolder visited,
    /// so later siblings see less depth than earlier ones.
    #[default]
    Shared,
    /// Every subfolder gets `depth - 1`, independent of its siblings.
    PerBranch,
}

/// One folder-to-zip request.
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    pub folder_id: String,
    /// Number of folder levels to include, starting with the root folder itself.
    pub depth: u32,
    /// Flatten every file into the archive root and omit folder entries.
    pub files_only: bool,
    pub include: HashSet<String>,
    pub exclude: HashSet<String>,
    pub depth_budget: DepthBudget,
}

impl ArchiveJob {
    pub fn new(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            depth: UNBOUNDED_DEPTH,
            files_only: false,
            include: HashSet::new(),
            exclude: HashSet::new(),
            depth_budget: DepthBudget::default(),
        }
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn files_only(mut self, files_only: bool) -> Self {
        self.files_only = files_only;
        self
    }

    /// Keep only files with one of these extensions (`txt` or `.txt`).
    pub fn include<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include.extend(normalize_all(extensions));
        self
    }

    /// Drop files with one of these extensions.
    pub fn exclude<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude.extend(normalize_all(extensions));
        self
    }

    pub fn depth_budget(mut self, depth_budget: DepthBudget) -> Self {
        self.depth_budget = depth_budget;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            !self.folder_id.trim().is_empty(),
            InvalidArgumentSnafu {
                message: "folder id must not be empty".to_string(),
            }
        );
        ensure!(
            self.depth > 0,
            InvalidArgumentSnafu {
                message: "depth must be a positive number".to_string(),
            }
        );
        Ok(())
    }

    /// Inclusion applies first when non-empty, exclusion applies after it.
    fn keeps(&self, file: &RemoteEntry) -> bool {
        let extension = file.extension().to_ascii_lowercase();
        if !self.include.is_empty() && !self.include.contains(&extension) {
            return false;
        }
        !self.exclude.contains(&extension)
    }
}

fn normalize_all<I, S>(extensions: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|e| normalize_extension(e.as_ref()))
        .filter(|e| !e.is_empty())
}

/// Trait for packing a remote folder tree into a zip archive.
pub trait Archiver {
    /// Build the archive described by `job`.
    ///
    /// # Arguments
    /// * `job` - Root folder, depth bound, filters and layout
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - The finished zip archive
    async fn archive(&self, job: &ArchiveJob) -> Result<Vec<u8>>;
}

/// Archiver that walks a folder tree sequentially through a [`RemoteStorage`].
pub struct FolderArchiver<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> FolderArchiver<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    fn archive_folder<'f>(
        &'f self,
        writer: &'f mut ArchiveWriter,
        job: &'f ArchiveJob,
        folder_id: &'f str,
        prefix: String,
        depth: u32,
    ) -> BoxFuture<'f, Result<()>> {
        Box::pin(async move {
            let children = list_all_children(self.storage, folder_id).await?;
            let (folders, files): (Vec<_>, Vec<_>) =
                children.into_iter().partition(RemoteEntry::is_folder);

            for file in files.iter().filter(|file| job.keeps(file)) {
                let Some(content) = self.storage.download_content(&file.id).await? else {
                    log::debug!("archive: no content for '{}', skipped", file.id);
                    continue;
                };
                writer.add_file(&format!("{prefix}{}", file.file_name()), &content)?;
            }

            let mut remaining = depth;
            for folder in &folders {
                let child_prefix = if job.files_only {
                    String::new()
                } else {
                    writer.add_folder(&format!("{prefix}{}", folder.file_name()))?
                };

                let child_depth = match job.depth_budget {
                    DepthBudget::Shared => {
                        remaining = remaining.saturating_sub(1);
                        remaining
                    }
                    DepthBudget::PerBranch => depth.saturating_sub(1),
                };
                if child_depth > 0 {
                    self.archive_folder(&mut *writer, job, &folder.id, child_prefix, child_depth)
                        .await?;
                }
            }
            Ok(())
        })
    }
}

impl<S: RemoteStorage> Archiver for FolderArchiver<'_, S> {
    async fn archive(&self, job: &ArchiveJob) -> Result<Vec<u8>> {
        job.validate()?;
        let root = self
            .storage
            .get_by_id(&job.folder_id)
            .await?
            .context(NotFoundSnafu {
                id: job.folder_id.clone(),
            })?;
        ensure!(
            root.is_folder(),
            InvalidArgumentSnafu {
                message: format!("'{}' is not a folder", job.folder_id),
            }
        );

        let mut writer = ArchiveWriter::new();
        self.archive_folder(&mut writer, job, &root.id, String::new(), job.depth)
            .await?;
        log::debug!(
            "archive: folder={} entries={} files_only={}",
            root.id,
            writer.len(),
            job.files_only
        );
        writer.finish()
    }
}

/// Zip container for one archive call. Entry names are kept unique.
struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl ArchiveWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn add_file(&mut self, name: &str, content: &[u8]) -> Result<String> {
        let name = self.unique_name(name);
        self.zip
            .start_file(name.as_str(), SimpleFileOptions::default())?;
        self.zip.write_all(content)?;
        Ok(name)
    }

    /// Add a zero-length folder entry; `name` ends with '/'.
    fn add_folder(&mut self, name: &str) -> Result<String> {
        let name = self.unique_name(name);
        self.zip
            .add_directory(name.as_str(), SimpleFileOptions::default())?;
        Ok(name)
    }

    /// `a.txt` becomes `a (2).txt`, `docs/` becomes `docs (2)/`.
    fn unique_name(&mut self, name: &str) -> String {
        if self.names.insert(name.to_string()) {
            return name.to_string();
        }
        let (stem, suffix) = match name.strip_suffix('/') {
            Some(stem) => (stem, "/"),
            None => {
                let base_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
                let extension = extension_of(&name[base_start..]);
                (&name[..name.len() - extension.len()], extension)
            }
        };
        let mut counter = 2;
        loop {
            let candidate = format!("{stem} ({counter}){suffix}");
            if self.names.insert(candidate.clone()) {
                log::warn!("archive: duplicate entry '{name}' stored as '{candidate}'");
                return candidate;
            }
            counter += 1;
        }
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}
