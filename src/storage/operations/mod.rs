// Storage operation traits and implementations
pub mod archive;
pub mod compress;
pub mod delete;
pub mod download;
pub mod list;
pub mod mkdir;
pub mod rename;
pub mod upload;

pub use archive::{ArchiveJob, Archiver, DepthBudget, FolderArchiver};
pub use compress::{Compressor, RemoteCompressor};
pub use delete::{Deleter, RemoteDeleter};
pub use download::{Downloader, RemoteDownloader};
pub use list::{EntryListing, Lister, RemoteLister};
pub use mkdir::{FolderCreator, RemoteFolderCreator};
pub use rename::{RemoteRenamer, Renamer};
pub use upload::{RemoteUploader, Uploader};
