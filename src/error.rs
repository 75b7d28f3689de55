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

    #[snafu(display("Operation '{operation}' is not supported by provider {provider}"))]
    UnsupportedOperation { operation: String, provider: String },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Invalid batch configuration: {reason}"))]
    InvalidConfig { reason: String },

    #[snafu(display(
        "Batch aborted at item {index} ('{source_ref}' -> '{destination_ref}'), {} item(s) not attempted: {source}",
        not_attempted.len()
    ))]
    BatchAborted {
        index: usize,
        source_ref: String,
        destination_ref: String,
        not_attempted: Vec<usize>,
        source: Box<Error>,
    },

    #[snafu(display("Bucket already exists: {bucket}"))]
    BucketAlreadyExists { bucket: String },

    #[snafu(display("Bucket is not empty: {bucket}"))]
    BucketNotEmpty { bucket: String },

    #[snafu(display("Bucket operation '{operation}' failed for '{bucket}': {source}"))]
    BucketOperationFailed {
        operation: String,
        bucket: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to download '{remote_path}' to '{local_path}': {source}"))]
    DownloadFailed {
        remote_path: String,
        local_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to upload '{local_path}' to '{remote_path}': {source}"))]
    UploadFailed {
        local_path: String,
        remote_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to delete '{path}': {source}"))]
    DeleteFailed { path: String, source: Box<Error> },

    #[snafu(display("Failed to list '{path}': {source}"))]
    ListFailed { path: String, source: Box<Error> },

    #[snafu(display("Failed to stat '{path}': {source}"))]
    StatFailed { path: String, source: Box<Error> },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json { source: error }
    }
}
