// Bucket lifecycle operations
use crate::error::{BucketAlreadyExistsSnafu, BucketNotEmptySnafu, Error, Result};
use opendal::{ErrorKind, Operator};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Trait for managing buckets.
pub trait BucketManager {
    async fn exists(&self, bucket: &str) -> Result<bool>;

    /// Fails with `BucketAlreadyExists` if the bucket is present.
    async fn create(&self, bucket: &str) -> Result<()>;

    /// The bucket must be empty.
    async fn delete(&self, bucket: &str) -> Result<()>;

    /// Bucket names, sorted.
    async fn list(&self) -> Result<Vec<String>>;
}

/// Buckets as directories directly below a filesystem root.
pub struct FsBucketManager {
    root: PathBuf,
}

impl FsBucketManager {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }
}

impl BucketManager for FsBucketManager {
    async fn exists(&self, bucket: &str) -> Result<bool> {
        match fs::metadata(self.bucket_path(bucket)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create(&self, bucket: &str) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        match fs::create_dir(self.bucket_path(bucket)).await {
            Ok(()) => {
                log::info!("created bucket {bucket}");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                BucketAlreadyExistsSnafu { bucket }.fail()
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, bucket: &str) -> Result<()> {
        let path = self.bucket_path(bucket);
        match fs::remove_dir(&path).await {
            Ok(()) => {
                log::info!("deleted bucket {bucket}");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::PathNotFound { path }),
            Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => {
                BucketNotEmptySnafu { bucket }.fail()
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut buckets = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                buckets.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        buckets.sort();
        log::debug!("found {} bucket(s) under {}", buckets.len(), self.root.display());
        Ok(buckets)
    }
}

/// Probe an object store bucket through an operator bound to it.
///
/// Missing buckets and denied access both report `false`; denied access is
/// logged since the bucket may exist without being visible to us.
pub async fn probe_bucket(operator: &Operator, bucket: &str) -> Result<bool> {
    match operator.list_with("/").limit(1).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            log::warn!(
                "permission denied checking bucket '{bucket}', assuming it does not exist or is not accessible"
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
