use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Invalid configuration for '{key}': {message}"))]
    InvalidConfig { key: String, message: String },

    #[snafu(display("Entry not found: {id}"))]
    NotFound { id: String },

    #[snafu(display("Invalid argument: {message}"))]
    InvalidArgument { message: String },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Use -R to upload directories"))]
    DirectoryUploadNotRecursive,

    #[snafu(display("Partial deletion failure: {} id(s) failed to delete: {}", failed_ids.len(), failed_ids.join(", ")))]
    PartialDeletion { failed_ids: Vec<String> },

    #[snafu(display("Failed to archive folder '{folder_id}': {source}"))]
    ArchiveFailed {
        folder_id: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to download '{id}' to '{local_path}': {source}"))]
    DownloadFailed {
        id: String,
        local_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to upload '{local_path}': {source}"))]
    UploadFailed {
        local_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to compress folder '{folder_id}': {source}"))]
    CompressFailed {
        folder_id: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to create folder '{name}': {source}"))]
    CreateFolderFailed { name: String, source: Box<Error> },

    #[snafu(display("Failed to rename '{id}' to '{new_name}': {source}"))]
    RenameFailed {
        id: String,
        new_name: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to delete '{id}': {source}"))]
    DeleteFailed { id: String, source: Box<Error> },

    #[snafu(display("Failed to list folder '{folder_id}': {source}"))]
    ListFolderFailed {
        folder_id: String,
        source: Box<Error>,
    },

    #[snafu(display("Transport failure: {source}"))]
    Transport { source: opendal::Error },

    #[snafu(display("Zip error: {source}"))]
    Zip { source: zip::result::ZipError },

    #[snafu(display("JSON encoding error: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl Error {
    /// Innermost error behind any number of operation wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::ArchiveFailed { source, .. }
            | Error::DownloadFailed { source, .. }
            | Error::UploadFailed { source, .. }
            | Error::CompressFailed { source, .. }
            | Error::CreateFolderFailed { source, .. }
            | Error::RenameFailed { source, .. }
            | Error::DeleteFailed { source, .. }
            | Error::ListFolderFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root_cause(), Error::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.root_cause(), Error::InvalidArgument { .. })
    }
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::Transport { source: error }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        Error::Zip { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
