use crate::error::Result;
use opendal::{EntryMode, ErrorKind, Operator};
use serde::Serialize;

/// Object metadata returned by `get_object_metadata`.
///
/// - `path`: The queried object path (as provided by caller)
/// - `entry_type`: One of `file`, `dir`, or `other`
/// - `size`: Content length in bytes
/// - `last_modified`: RFC3339 string if available
/// - `etag`: Backend provided entity tag if available
/// - `content_type`: MIME type if available
/// - `content_md5`: Backend provided MD5 digest if available
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    pub path: String,
    pub entry_type: String, // file | dir | other
    pub size: u64,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
    pub content_md5: Option<String>,
}

/// Trait for fetching object metadata from storage.
pub trait Stater {
    /// Fetch metadata for a single object.
    ///
    /// # Returns
    /// * `Result<Option<ObjectMeta>>` - `None` when the object does not exist
    async fn stat(&self, path: &str) -> Result<Option<ObjectMeta>>;
}

/// Implementation of `Stater` for OpenDAL `Operator`.
#[derive(Clone)]
pub struct OpenDalStater {
    operator: Operator,
}

impl OpenDalStater {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Stater for OpenDalStater {
    /// Fetch object metadata via OpenDAL's `stat` API, and normalize fields to printable types.
    async fn stat(&self, path: &str) -> Result<Option<ObjectMeta>> {
        let meta = match self.operator.stat(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("object '{path}' not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let entry_type = match meta.mode() {
            EntryMode::FILE => "file".to_string(),
            EntryMode::DIR => "dir".to_string(),
            _ => "other".to_string(),
        };

        Ok(Some(ObjectMeta {
            path: path.to_owned(),
            entry_type,
            size: meta.content_length(),
            last_modified: meta.last_modified().map(|t| t.to_string()),
            etag: meta.etag().map(|s| s.to_string()),
            content_type: meta.content_type().map(|s| s.to_string()),
            content_md5: meta.content_md5().map(|s| s.to_string()),
        }))
    }
}
