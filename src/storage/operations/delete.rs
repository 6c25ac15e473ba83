use crate::error::{DeleteFailedSnafu, InvalidArgumentSnafu, PartialDeletionSnafu, Result};
use crate::storage::remote::RemoteStorage;
use snafu::{ResultExt, ensure};

/// Trait for deleting entries from storage.
pub trait Deleter {
    /// Delete one entry; folders go together with everything below them.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete several entries, continuing past failures.
    ///
    /// # Returns
    /// * `Result<()>` - `PartialDeletion` listing every id that could not be removed
    async fn delete_many(&self, ids: &[String]) -> Result<()>;
}

/// Implementation of Deleter for any [`RemoteStorage`].
pub struct RemoteDeleter<'a, S> {
    storage: &'a S,
}

impl<'a, S: RemoteStorage> RemoteDeleter<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: RemoteStorage> Deleter for RemoteDeleter<'_, S> {
    async fn delete(&self, id: &str) -> Result<()> {
        ensure!(
            !id.is_empty(),
            InvalidArgumentSnafu {
                message: "entry id must not be empty".to_string()
            }
        );
        self.storage.delete(id).await?;
        log::info!("deleted {id}");
        Ok(())
    }

    async fn delete_many(&self, ids: &[String]) -> Result<()> {
        let mut failed_ids = Vec::new();
        for id in ids {
            if let Err(err) = self
                .delete(id)
                .await
                .map_err(Box::new)
                .context(DeleteFailedSnafu { id: id.clone() })
            {
                log::error!("{err}");
                failed_ids.push(id.clone());
            }
        }
        ensure!(failed_ids.is_empty(), PartialDeletionSnafu { failed_ids });
        Ok(())
    }
}
