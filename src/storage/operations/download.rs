use crate::error::Result;
use crate::storage::batch::{Transfer, TransferItem};
use crate::storage::utils::path::{basename, ensure_trailing_slash, get_root_relative_path};
use crate::storage::utils::size::format_size;
use futures::stream::TryStreamExt;
use opendal::{EntryMode, Operator};
use std::path::Path;
use tokio::fs;

/// Trait for downloading a single object from storage.
pub trait Downloader {
    /// Download one remote object to an exact local file path.
    ///
    /// # Arguments
    /// * `remote_path` - Source object path in storage
    /// * `local_path` - Destination file on the local filesystem
    ///
    /// # Returns
    /// * `Result<u64>` - Number of bytes written
    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64>;
}

/// Implementation of Downloader for OpenDAL Operator.
pub struct OpenDalDownloader {
    operator: Operator,
}

impl OpenDalDownloader {
    /// Create a new downloader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Build download items for one object or every object below a prefix,
    /// mirroring the remote layout under `local_dir`.
    pub async fn collect_items(
        &self,
        remote_prefix: &str,
        local_dir: &Path,
    ) -> Result<Vec<TransferItem>> {
        if !remote_prefix.is_empty() && !remote_prefix.ends_with('/') {
            let meta = self.operator.stat(remote_prefix).await?;
            if meta.mode() == EntryMode::FILE {
                let local_path = local_dir.join(basename(remote_prefix));
                return Ok(vec![TransferItem::new(
                    remote_prefix,
                    local_path.to_string_lossy(),
                )]);
            }
        }

        let base = if remote_prefix.is_empty() {
            "/".to_string()
        } else {
            ensure_trailing_slash(remote_prefix)
        };
        let mut lister = self.operator.lister_with(&base).recursive(true).await?;

        let mut items = Vec::new();
        while let Some(entry) = lister.try_next().await? {
            if entry.metadata().mode() != EntryMode::FILE {
                continue;
            }
            let remote_file_path = entry.path();
            let relative_path = get_root_relative_path(remote_file_path, &base);
            let local_file_path = local_dir.join(relative_path);
            items.push(TransferItem::new(
                remote_file_path,
                local_file_path.to_string_lossy(),
            ));
        }

        items.sort_by(|a, b| a.source().cmp(b.source()));
        Ok(items)
    }
}

impl Downloader for OpenDalDownloader {
    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64> {
        let data = self.operator.read(remote_path).await?;
        let size = data.len() as u64;

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(local_path, data.to_vec()).await?;

        log::info!(
            "downloaded {remote_path} -> {} ({})",
            local_path.display(),
            format_size(size)
        );
        Ok(size)
    }
}

impl Transfer for OpenDalDownloader {
    async fn exists(&self, item: &TransferItem) -> Result<bool> {
        Ok(fs::try_exists(item.destination()).await?)
    }

    async fn transfer(&self, item: &TransferItem) -> Result<()> {
        self.download(item.source(), Path::new(item.destination()))
            .await?;
        Ok(())
    }
}
