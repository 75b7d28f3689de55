use crate::error::Result;
use futures::stream::TryStreamExt;
use opendal::Operator;

/// Trait for listing objects in storage.
pub trait Lister {
    /// List every object whose path starts with `prefix`, recursively.
    ///
    /// The prefix is a plain string match: `"ab"` matches `"abc.txt"` and
    /// `"ab/c.txt"`, while `"ab/"` only matches objects below `ab/`.
    ///
    /// # Arguments
    /// * `prefix` - Object path prefix; empty lists the whole bucket
    ///
    /// # Returns
    /// * `Result<Vec<String>>` - Object paths, sorted, directories excluded
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Implementation of Lister for OpenDAL Operator.
pub struct OpenDalLister {
    operator: Operator,
}

impl OpenDalLister {
    /// Create a new lister with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Lister for OpenDalLister {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.trim_start_matches('/');
        let base = match prefix.rfind('/') {
            Some(pos) => &prefix[..=pos],
            None => "/",
        };

        let mut lister = self.operator.lister_with(base).recursive(true).await?;
        let mut paths = Vec::new();
        while let Some(entry) = lister.try_next().await? {
            if entry.metadata().mode().is_file() && entry.path().starts_with(prefix) {
                paths.push(entry.path().to_string());
            }
        }

        paths.sort();
        log::debug!("listed {} object(s) matching '{prefix}'", paths.len());
        Ok(paths)
    }
}
