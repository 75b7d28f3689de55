use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::storage::constants::DEFAULT_FS_ROOT;
use crate::storage::{StorageConfig, StorageProvider};

// Read `primary_key`, falling back to the provider specific `secondary_key`.
fn get_env_var(primary_key: &str, secondary_key: &str) -> Result<String> {
    env::var(primary_key)
        .or_else(|_| env::var(secondary_key))
        .map_err(|_| Error::MissingEnvVar {
            key: format!("{primary_key} or {secondary_key}"),
        })
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_str = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "oss".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;

    match provider {
        StorageProvider::Oss => load_oss_config(),
        StorageProvider::S3 => load_s3_config(&provider_str),
        StorageProvider::Fs => load_fs_config(),
        StorageProvider::Hdfs => load_hdfs_config(),
    }
}

/// Load OSS (Alibaba Cloud) configuration
fn load_oss_config() -> Result<StorageConfig> {
    let bucket = get_env_var("STORAGE_BUCKET", "OSS_BUCKET")?;
    let access_key_id = get_env_var("STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID")?;
    let access_key_secret = get_env_var("STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET")?;

    let region = env::var("STORAGE_REGION")
        .or_else(|_| env::var("OSS_REGION"))
        .ok();

    let endpoint = env::var("STORAGE_ENDPOINT")
        .or_else(|_| env::var("OSS_ENDPOINT"))
        .unwrap_or_else(|_| "https://oss-cn-hangzhou.aliyuncs.com".to_string());

    let mut config = StorageConfig::oss(bucket, access_key_id, access_key_secret, region);
    config.endpoint = Some(endpoint);
    Ok(config)
}

/// Load S3 (AWS) or MinIO configuration
fn load_s3_config(provider_str: &str) -> Result<StorageConfig> {
    let is_minio = provider_str.eq_ignore_ascii_case("minio");

    let (bucket_key, access_key, secret_key) = if is_minio {
        ("MINIO_BUCKET", "MINIO_ACCESS_KEY", "MINIO_SECRET_KEY")
    } else {
        ("AWS_S3_BUCKET", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY")
    };

    let bucket = get_env_var("STORAGE_BUCKET", bucket_key)?;
    let access_key_id = get_env_var("STORAGE_ACCESS_KEY_ID", access_key)?;
    let secret_access_key = get_env_var("STORAGE_ACCESS_KEY_SECRET", secret_key)?;

    let region = env::var("STORAGE_REGION")
        .or_else(|_| env::var("AWS_DEFAULT_REGION"))
        .or_else(|_| env::var("MINIO_DEFAULT_REGION"))
        .ok();

    let endpoint = if is_minio {
        Some(
            env::var("STORAGE_ENDPOINT")
                .or_else(|_| env::var("MINIO_ENDPOINT"))
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
        )
    } else {
        env::var("STORAGE_ENDPOINT").ok()
    };

    let mut config = StorageConfig::s3(bucket, access_key_id, secret_access_key, region);
    config.endpoint = endpoint;
    Ok(config)
}

/// Load filesystem configuration. Buckets are directories under the root.
fn load_fs_config() -> Result<StorageConfig> {
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| DEFAULT_FS_ROOT.to_string());
    let mut config = StorageConfig::fs(root_path);
    if let Ok(bucket) = env::var("STORAGE_BUCKET") {
        config.bucket = bucket;
    }
    Ok(config)
}

/// Load HDFS configuration
fn load_hdfs_config() -> Result<StorageConfig> {
    let name_node = get_env_var("STORAGE_NAME_NODE", "HDFS_NAME_NODE")?;
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| "/".to_string());
    Ok(StorageConfig::hdfs(name_node, root_path))
}
