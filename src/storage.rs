use crate::error::{Error, Result};
use opendal::Operator;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

pub mod batch;
pub mod constants;
mod operations;
mod utils;

use self::batch::{BatchConfig, BatchResult, Dispatcher, TransferItem};
use self::constants::DEFAULT_FS_BUCKET;
use self::operations::bucket::{FsBucketManager, probe_bucket};
use self::operations::delete::OpenDalDeleter;
use self::operations::download::OpenDalDownloader;
use self::operations::list::OpenDalLister;
use self::operations::stat::OpenDalStater;
use self::operations::upload::OpenDalUploader;
use self::operations::{BucketManager, Deleter, Downloader, Lister, Stater, Uploader};
use crate::wrap_err;

pub use self::operations::stat::ObjectMeta;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Fs,
    Hdfs,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
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
}

impl StorageConfig {
    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::Oss,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            endpoint: None,
            region,
            root_path: None,
            name_node: None,
        }
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            endpoint: None,
            region,
            root_path: None,
            name_node: None,
        }
    }

    /// Filesystem storage; each bucket is a directory below `root_path`.
    pub fn fs(root_path: String) -> Self {
        Self {
            provider: StorageProvider::Fs,
            bucket: DEFAULT_FS_BUCKET.to_string(),
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path),
            name_node: None,
        }
    }

    pub fn hdfs(name_node: String, root_path: String) -> Self {
        Self {
            provider: StorageProvider::Hdfs,
            bucket: "hdfs".to_string(), // Bucket is not really used for HDFS
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path),
            name_node: Some(name_node),
        }
    }

    fn fs_root(&self) -> &str {
        self.root_path.as_deref().unwrap_or("./")
    }
}

/// Unified storage client using OpenDAL.
///
/// The client is bound to the bucket in its configuration. Operations that
/// name another bucket build a separate operator for it.
#[derive(Clone)]
pub struct StorageClient {
    operator: Operator,
    config: StorageConfig,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        Ok(Self { operator, config })
    }

    pub fn provider(&self) -> StorageProvider {
        self.config.provider
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        match &config.provider {
            StorageProvider::Oss => {
                #[cfg(feature = "oss")]
                {
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

                #[cfg(not(feature = "oss"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "oss (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::S3 => {
                #[cfg(feature = "s3")]
                {
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

                #[cfg(not(feature = "s3"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "s3 (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::Fs => {
                #[cfg(feature = "fs")]
                {
                    let root = Path::new(config.fs_root()).join(&config.bucket);
                    let builder = opendal::services::Fs::default().root(&root.to_string_lossy());
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "fs"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "fs (feature disabled)".to_string(),
                    })
                }
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

    /// Operator for `bucket`, reusing the client's own when it matches.
    fn operator_for(&self, bucket: &str) -> Result<Operator> {
        if bucket == self.config.bucket {
            return Ok(self.operator.clone());
        }
        let mut config = self.config.clone();
        config.bucket = bucket.to_string();
        Self::build_operator(&config)
    }

    /// Bucket management is only available where buckets are plain directories.
    fn bucket_manager(&self, operation: &str) -> Result<FsBucketManager> {
        match self.config.provider {
            StorageProvider::Fs => Ok(FsBucketManager::new(self.config.fs_root())),
            provider => Err(Error::UnsupportedOperation {
                operation: operation.to_string(),
                provider: format!("{provider:?}"),
            }),
        }
    }

    pub async fn submit_upload_batch(
        &self,
        bucket: &str,
        items: Vec<TransferItem>,
        config: &BatchConfig,
    ) -> Result<BatchResult> {
        log::debug!(
            "submit_upload_batch provider={:?} bucket={} items={} max_workers={}",
            self.config.provider,
            bucket,
            items.len(),
            config.max_workers
        );
        config.validate()?;
        let uploader = OpenDalUploader::new(self.operator_for(bucket)?);
        Dispatcher::new(Arc::new(uploader), config.clone())
            .run(items)
            .await
    }

    pub async fn submit_download_batch(
        &self,
        bucket: &str,
        items: Vec<TransferItem>,
        config: &BatchConfig,
    ) -> Result<BatchResult> {
        log::debug!(
            "submit_download_batch provider={:?} bucket={} items={} max_workers={}",
            self.config.provider,
            bucket,
            items.len(),
            config.max_workers
        );
        config.validate()?;
        let downloader = OpenDalDownloader::new(self.operator_for(bucket)?);
        Dispatcher::new(Arc::new(downloader), config.clone())
            .run(items)
            .await
    }

    /// Build download items for every object below `remote_prefix` in `bucket`.
    pub async fn collect_download_items(
        &self,
        bucket: &str,
        remote_prefix: &str,
        local_dir: impl AsRef<Path>,
    ) -> Result<Vec<TransferItem>> {
        log::debug!(
            "collect_download_items provider={:?} bucket={} remote_prefix={}",
            self.config.provider,
            bucket,
            remote_prefix
        );
        let downloader = OpenDalDownloader::new(self.operator_for(bucket)?);
        wrap_err!(
            downloader
                .collect_items(remote_prefix, local_dir.as_ref())
                .await,
            ListFailed {
                path: remote_prefix.to_string()
            }
        )
    }

    pub async fn upload_object(
        &self,
        bucket: &str,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<()> {
        let local_path = local_path.as_ref();
        log::debug!(
            "upload_object provider={:?} bucket={} local_path={} remote_path={}",
            self.config.provider,
            bucket,
            local_path.display(),
            remote_path
        );
        let uploader = OpenDalUploader::new(self.operator_for(bucket)?);
        wrap_err!(
            uploader
                .upload(local_path, remote_path, &Default::default())
                .await
                .map(|_| ()),
            UploadFailed {
                local_path: local_path.display().to_string(),
                remote_path: remote_path.to_string()
            }
        )
    }

    pub async fn download_object(
        &self,
        bucket: &str,
        remote_path: &str,
        local_path: impl AsRef<Path>,
    ) -> Result<()> {
        let local_path = local_path.as_ref();
        log::debug!(
            "download_object provider={:?} bucket={} remote_path={} local_path={}",
            self.config.provider,
            bucket,
            remote_path,
            local_path.display()
        );
        let downloader = OpenDalDownloader::new(self.operator_for(bucket)?);
        wrap_err!(
            downloader.download(remote_path, local_path).await.map(|_| ()),
            DownloadFailed {
                remote_path: remote_path.to_string(),
                local_path: local_path.display().to_string()
            }
        )
    }

    pub async fn delete_object(&self, bucket: &str, remote_path: &str) -> Result<()> {
        log::debug!(
            "delete_object provider={:?} bucket={} remote_path={}",
            self.config.provider,
            bucket,
            remote_path
        );
        let deleter = OpenDalDeleter::new(self.operator_for(bucket)?);
        match deleter.delete(remote_path).await {
            Err(e @ Error::PathNotFound { .. }) => Err(e),
            other => wrap_err!(
                other,
                DeleteFailed {
                    path: remote_path.to_string()
                }
            ),
        }
    }

    pub async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        log::debug!(
            "list_objects provider={:?} bucket={} prefix={}",
            self.config.provider,
            bucket,
            prefix
        );
        let lister = OpenDalLister::new(self.operator_for(bucket)?);
        wrap_err!(
            lister.list(prefix).await,
            ListFailed {
                path: prefix.to_string()
            }
        )
    }

    /// Metadata for one object, or `None` if it does not exist.
    pub async fn get_object_metadata(
        &self,
        bucket: &str,
        remote_path: &str,
    ) -> Result<Option<ObjectMeta>> {
        log::debug!(
            "get_object_metadata provider={:?} bucket={} remote_path={}",
            self.config.provider,
            bucket,
            remote_path
        );
        let stater = OpenDalStater::new(self.operator_for(bucket)?);
        wrap_err!(
            stater.stat(remote_path).await,
            StatFailed {
                path: remote_path.to_string()
            }
        )
    }

    pub async fn object_exists(&self, bucket: &str, remote_path: &str) -> Result<bool> {
        log::debug!(
            "object_exists provider={:?} bucket={} remote_path={}",
            self.config.provider,
            bucket,
            remote_path
        );
        let operator = self.operator_for(bucket)?;
        wrap_err!(
            operator.exists(remote_path).await,
            StatFailed {
                path: remote_path.to_string()
            }
        )
    }

    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        log::debug!(
            "bucket_exists provider={:?} bucket={}",
            self.config.provider,
            bucket
        );
        let exists = match self.config.provider {
            StorageProvider::Fs => self.bucket_manager("bucket_exists")?.exists(bucket).await,
            _ => probe_bucket(&self.operator_for(bucket)?, bucket).await,
        };
        wrap_err!(
            exists,
            BucketOperationFailed {
                operation: "exists".to_string(),
                bucket: bucket.to_string()
            }
        )
    }

    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        log::debug!(
            "create_bucket provider={:?} bucket={}",
            self.config.provider,
            bucket
        );
        match self.bucket_manager("create_bucket")?.create(bucket).await {
            Err(e @ Error::BucketAlreadyExists { .. }) => Err(e),
            other => wrap_err!(
                other,
                BucketOperationFailed {
                    operation: "create".to_string(),
                    bucket: bucket.to_string()
                }
            ),
        }
    }

    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        log::debug!(
            "delete_bucket provider={:?} bucket={}",
            self.config.provider,
            bucket
        );
        match self.bucket_manager("delete_bucket")?.delete(bucket).await {
            Err(e @ (Error::BucketNotEmpty { .. } | Error::PathNotFound { .. })) => Err(e),
            other => wrap_err!(
                other,
                BucketOperationFailed {
                    operation: "delete".to_string(),
                    bucket: bucket.to_string()
                }
            ),
        }
    }

    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        log::debug!("list_buckets provider={:?}", self.config.provider);
        let root = PathBuf::from(self.config.fs_root());
        wrap_err!(
            self.bucket_manager("list_buckets")?.list().await,
            ListFailed {
                path: root.display().to_string()
            }
        )
    }
}
