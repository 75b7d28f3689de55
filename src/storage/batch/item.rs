use crate::error::{PathNotFoundSnafu, Result};
use crate::storage::utils::path::build_remote_path;
use async_recursion::async_recursion;
use serde::Serialize;
use snafu::ensure;
use std::path::Path;
use tokio::fs;

/// Options applied to a single transfer. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemOptions {
    /// MIME type stored with an uploaded object.
    pub content_type: Option<String>,
    /// Chunk size used by the remote writer when uploading.
    pub chunk_size: Option<usize>,
}

/// One source → destination unit within a batch.
///
/// `source` and `destination` are opaque to the dispatcher: a local path or a
/// remote object path depending on the direction of the transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferItem {
    source: String,
    destination: String,
    options: ItemOptions,
}

impl TransferItem {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            options: ItemOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ItemOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn options(&self) -> &ItemOptions {
        &self.options
    }
}

/// Build upload items for a local file or every file below a local directory.
///
/// Items are sorted by source path so repeated walks of the same tree yield
/// the same submission order.
pub async fn collect_upload_items(local_path: &Path, remote_prefix: &str) -> Result<Vec<TransferItem>> {
    ensure!(
        local_path.exists(),
        PathNotFoundSnafu {
            path: local_path.to_path_buf()
        }
    );

    let mut items = Vec::new();
    if local_path.is_file() {
        let file_name = local_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        items.push(TransferItem::new(
            local_path.to_string_lossy(),
            build_remote_path(remote_prefix, &file_name),
        ));
    } else {
        walk_local_dir(local_path, remote_prefix, &mut items).await?;
    }

    items.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(items)
}

#[async_recursion]
async fn walk_local_dir(dir: &Path, remote_prefix: &str, items: &mut Vec<TransferItem>) -> Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let local_file_path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();
        let remote_path = build_remote_path(remote_prefix, &file_name);

        if entry.file_type().await?.is_dir() {
            walk_local_dir(&local_file_path, &remote_path, items).await?;
        } else {
            items.push(TransferItem::new(local_file_path.to_string_lossy(), remote_path));
        }
    }
    Ok(())
}
