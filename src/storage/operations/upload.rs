use crate::error::{InvalidConfigSnafu, PathNotFoundSnafu, Result};
use crate::storage::batch::{ItemOptions, Transfer, TransferItem};
use crate::storage::constants::DEFAULT_BUFFER_SIZE;
use crate::storage::utils::size::format_size;
use opendal::Operator;
use snafu::ensure;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

/// Trait for uploading a single local file to storage.
pub trait Uploader {
    /// Upload one local file to an exact remote object path.
    ///
    /// # Arguments
    /// * `local_path` - Source file on the local filesystem
    /// * `remote_path` - Destination object path in storage
    /// * `options` - Content type and writer chunking for the object
    ///
    /// # Returns
    /// * `Result<u64>` - Number of bytes written
    async fn upload(&self, local_path: &Path, remote_path: &str, options: &ItemOptions)
    -> Result<u64>;
}

/// Implementation of Uploader for OpenDAL Operator.
pub struct OpenDalUploader {
    operator: Operator,
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Stream a file into the remote writer buffer by buffer.
    async fn upload_file_streaming(
        &self,
        local_path: &Path,
        remote_path: &str,
        options: &ItemOptions,
    ) -> Result<u64> {
        let file = fs::File::open(local_path).await?;
        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut total_bytes = 0u64;

        let mut pending = self.operator.writer_with(remote_path);
        if let Some(content_type) = options.content_type.as_deref() {
            pending = pending.content_type(content_type);
        }
        if let Some(chunk_size) = options.chunk_size {
            pending = pending.chunk(chunk_size);
        }
        let mut writer = pending.await?;

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            writer.write(buffer[..bytes_read].to_vec()).await?;
            total_bytes += bytes_read as u64;
        }
        writer.close().await?;

        log::info!(
            "uploaded {} -> {remote_path} ({})",
            local_path.display(),
            format_size(total_bytes)
        );
        Ok(total_bytes)
    }
}

impl Uploader for OpenDalUploader {
    async fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        options: &ItemOptions,
    ) -> Result<u64> {
        ensure!(
            local_path.is_file(),
            PathNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );
        ensure!(
            options.chunk_size != Some(0),
            InvalidConfigSnafu {
                reason: "chunk size must be greater than zero",
            }
        );
        self.upload_file_streaming(local_path, remote_path, options)
            .await
    }
}

impl Transfer for OpenDalUploader {
    async fn exists(&self, item: &TransferItem) -> Result<bool> {
        Ok(self.operator.exists(item.destination()).await?)
    }

    async fn transfer(&self, item: &TransferItem) -> Result<()> {
        self.upload(Path::new(item.source()), item.destination(), item.options())
            .await?;
        Ok(())
    }
}
