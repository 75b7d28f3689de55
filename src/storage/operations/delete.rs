// Delete operation trait and implementation
use crate::error::{Error, Result};
use opendal::{ErrorKind, Operator};
use std::path::PathBuf;

/// Trait for deleting single objects from storage.
pub trait Deleter {
    /// Delete one object.
    ///
    /// # Arguments
    /// * `path` - Object path to delete
    ///
    /// # Returns
    /// * `Result<()>` - `PathNotFound` if the object does not exist
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Implementation of Deleter for OpenDAL Operator.
pub struct OpenDalDeleter {
    operator: Operator,
}

impl OpenDalDeleter {
    /// Create a new deleter with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Deleter for OpenDalDeleter {
    async fn delete(&self, path: &str) -> Result<()> {
        match self.operator.stat(path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::PathNotFound {
                    path: PathBuf::from(path),
                });
            }
            Err(e) => return Err(e.into()),
        }

        self.operator.delete(path).await?;
        log::info!("deleted {path}");
        Ok(())
    }
}
