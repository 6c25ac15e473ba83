use crate::error::{Error, Result};
use opendal::Operator;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod backend;
pub mod constants;
pub mod entry;
pub mod mime;
pub mod operations;
pub mod remote;
pub mod utils;

use self::backend::OpenDalBackend;
use self::constants::DEFAULT_PAGE_SIZE;
use self::entry::RemoteEntry;
use self::operations::{
    ArchiveJob, Archiver, Compressor, Deleter, Downloader, FolderArchiver, FolderCreator, Lister,
    RemoteCompressor, RemoteDeleter, RemoteDownloader, RemoteFolderCreator, RemoteLister,
    RemoteRenamer, RemoteUploader, Renamer, Uploader,
};
use self::utils::progress::ProgressCallback;
use crate::wrap_err;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Cos,
    Fs,
    Hdfs,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "cos" => Ok(Self::Cos),
            "fs" => Ok(Self::Fs),
            "hdfs" => Ok(Self::Hdfs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Unified storage configuration for different providers
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
    pub name_node: Option<String>,
    /// Children returned per listing page.
    pub page_size: usize,
}

impl StorageConfig {
    fn base(provider: StorageProvider, bucket: String) -> Self {
        Self {
            provider,
            bucket,
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: None,
            name_node: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            region,
            ..Self::base(StorageProvider::Oss, bucket)
        }
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            region,
            ..Self::base(StorageProvider::S3, bucket)
        }
    }

    pub fn cos(bucket: String, secret_id: String, secret_key: String) -> Self {
        Self {
            access_key_id: Some(secret_id),
            access_key_secret: Some(secret_key),
            ..Self::base(StorageProvider::Cos, bucket)
        }
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            root_path: Some(root_path),
            ..Self::base(StorageProvider::Fs, "local".to_string())
        }
    }

    pub fn hdfs(name_node: String, root_path: String) -> Self {
        Self {
            root_path: Some(root_path),
            name_node: Some(name_node),
            ..Self::base(StorageProvider::Hdfs, "hdfs".to_string())
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Drive style client: id addressed folders and files on top of OpenDAL.
#[derive(Clone)]
pub struct StorageClient {
    backend: OpenDalBackend,
    provider: StorageProvider,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        Ok(Self {
            backend: OpenDalBackend::new(operator, config.page_size),
            provider: config.provider,
        })
    }

    pub fn provider(&self) -> StorageProvider {
        self.provider
    }

    pub fn operator(&self) -> &Operator {
        self.backend.operator()
    }

    pub fn backend(&self) -> &OpenDalBackend {
        &self.backend
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        match &config.provider {
            StorageProvider::Oss => {
                let mut builder = opendal::services::Oss::default().bucket(&config.bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(access_key_secret) = &config.access_key_secret {
                    builder = builder.access_key_secret(access_key_secret);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::S3 => {
                let mut builder = opendal::services::S3::default().bucket(&config.bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = &config.access_key_secret {
                    builder = builder.secret_access_key(secret_access_key);
                }
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Cos => {
                let mut builder = opendal::services::Cos::default().bucket(&config.bucket);
                if let Some(secret_id) = &config.access_key_id {
                    builder = builder.secret_id(secret_id);
                }
                if let Some(secret_key) = &config.access_key_secret {
                    builder = builder.secret_key(secret_key);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Fs => {
                let root = config
                    .root_path
                    .as_deref()
                    .unwrap_or(constants::DEFAULT_FS_ROOT);
                let builder = opendal::services::Fs::default().root(root);
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Hdfs => {
                #[cfg(feature = "hdfs")]
                {
                    let root = config.root_path.as_deref().unwrap_or("/");
                    let name_node = config.name_node.as_deref().unwrap_or_default();
                    let builder = opendal::services::Hdfs::default()
                        .root(root)
                        .name_node(name_node);
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "hdfs"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "hdfs (feature disabled)".to_string(),
                    })
                }
            }
        }
    }

    /// Build the zip archive for `job` in memory.
    pub async fn archive(&self, job: &ArchiveJob) -> Result<Vec<u8>> {
        log::debug!("archive provider={:?} job={:?}", self.provider, job);
        let archiver = FolderArchiver::new(&self.backend);
        wrap_err!(
            archiver.archive(job).await,
            ArchiveFailed {
                folder_id: job.folder_id.clone()
            }
        )
    }

    /// Write the archive for `job` to `<local_dir>/<name>.zip`.
    pub async fn download_archive(
        &self,
        job: &ArchiveJob,
        local_dir: &Path,
        name: Option<&str>,
    ) -> Result<PathBuf> {
        log::debug!(
            "download_archive provider={:?} job={:?} local_dir={} name={:?}",
            self.provider,
            job,
            local_dir.display(),
            name
        );
        let downloader = RemoteDownloader::new(&self.backend);
        wrap_err!(
            downloader.download_archive(job, local_dir, name).await,
            DownloadFailed {
                id: job.folder_id.clone(),
                local_path: local_dir.display().to_string()
            }
        )
    }

    /// Download a folder tree, structure included, as a zip.
    pub async fn download_folder(
        &self,
        folder_id: &str,
        local_dir: &Path,
        name: Option<&str>,
        depth: u32,
    ) -> Result<PathBuf> {
        let job = ArchiveJob::new(folder_id).depth(depth);
        self.download_archive(&job, local_dir, name).await
    }

    /// Download every file below a folder into one flat zip.
    pub async fn download_all_files(
        &self,
        folder_id: &str,
        local_dir: &Path,
        name: Option<&str>,
        depth: u32,
    ) -> Result<PathBuf> {
        let job = ArchiveJob::new(folder_id).depth(depth).files_only(true);
        self.download_archive(&job, local_dir, name).await
    }

    pub async fn download_file(
        &self,
        file_id: &str,
        local_dir: &Path,
        name: Option<&str>,
    ) -> Result<PathBuf> {
        log::debug!(
            "download_file provider={:?} file_id={} local_dir={} name={:?}",
            self.provider,
            file_id,
            local_dir.display(),
            name
        );
        let downloader = RemoteDownloader::new(&self.backend);
        wrap_err!(
            downloader.download_file(file_id, local_dir, name).await,
            DownloadFailed {
                id: file_id.to_string(),
                local_path: local_dir.display().to_string()
            }
        )
    }

    /// Zip a folder and store the archive next to it; returns the archive id.
    pub async fn compress_folder(&self, folder_id: &str) -> Result<String> {
        log::debug!(
            "compress_folder provider={:?} folder_id={}",
            self.provider,
            folder_id
        );
        let compressor = RemoteCompressor::new(&self.backend);
        wrap_err!(
            compressor.compress(folder_id).await,
            CompressFailed {
                folder_id: folder_id.to_string()
            }
        )
    }

    pub async fn upload_file(
        &self,
        local_path: &Path,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String> {
        log::debug!(
            "upload_file provider={:?} local_path={} parents={:?}",
            self.provider,
            local_path.display(),
            parents
        );
        let uploader = RemoteUploader::new(&self.backend);
        wrap_err!(
            uploader.upload_file(local_path, parents, progress).await,
            UploadFailed {
                local_path: local_path.display().to_string()
            }
        )
    }

    pub async fn upload_files(
        &self,
        local_paths: &[PathBuf],
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<Vec<String>> {
        log::debug!(
            "upload_files provider={:?} files_count={} parents={:?}",
            self.provider,
            local_paths.len(),
            parents
        );
        let uploader = RemoteUploader::new(&self.backend);
        wrap_err!(
            uploader.upload_files(local_paths, parents, progress).await,
            UploadFailed {
                // summarize inputs to avoid huge error strings
                local_path: local_paths
                    .iter()
                    .take(5)
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            }
        )
    }

    pub async fn upload_folder(
        &self,
        local_path: &Path,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> Result<String> {
        log::debug!(
            "upload_folder provider={:?} local_path={} parents={:?}",
            self.provider,
            local_path.display(),
            parents
        );
        let uploader = RemoteUploader::new(&self.backend);
        wrap_err!(
            uploader.upload_folder(local_path, parents, progress).await,
            UploadFailed {
                local_path: local_path.display().to_string()
            }
        )
    }

    pub async fn create_folder(&self, name: &str, parents: &[String]) -> Result<String> {
        log::debug!(
            "create_folder provider={:?} name={} parents={:?}",
            self.provider,
            name,
            parents
        );
        let creator = RemoteFolderCreator::new(&self.backend);
        wrap_err!(
            creator.create_folder(name, parents).await,
            CreateFolderFailed {
                name: name.to_string()
            }
        )
    }

    pub async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteEntry> {
        log::debug!(
            "rename provider={:?} id={} new_name={}",
            self.provider,
            id,
            new_name
        );
        let renamer = RemoteRenamer::new(&self.backend);
        wrap_err!(
            renamer.rename(id, new_name).await,
            RenameFailed {
                id: id.to_string(),
                new_name: new_name.to_string()
            }
        )
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        log::debug!("delete provider={:?} id={}", self.provider, id);
        let deleter = RemoteDeleter::new(&self.backend);
        wrap_err!(deleter.delete(id).await, DeleteFailed { id: id.to_string() })
    }

    /// Delete every id, reporting the ones that failed together.
    pub async fn delete_many(&self, ids: &[String]) -> Result<()> {
        log::debug!(
            "delete_many provider={:?} ids_count={}",
            self.provider,
            ids.len()
        );
        RemoteDeleter::new(&self.backend).delete_many(ids).await
    }

    pub async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteEntry>> {
        log::debug!(
            "list_folder provider={:?} folder_id={}",
            self.provider,
            folder_id
        );
        let lister = RemoteLister::new(&self.backend);
        wrap_err!(
            lister.list(folder_id).await,
            ListFolderFailed {
                folder_id: folder_id.to_string()
            }
        )
    }

    pub async fn stat(&self, id: &str) -> Result<RemoteEntry> {
        log::debug!("stat provider={:?} id={}", self.provider, id);
        RemoteLister::new(&self.backend).stat(id).await
    }
}
