use crate::error::Result;
use crate::storage::entry::{ChildPage, RemoteEntry};
use crate::storage::utils::progress::ProgressCallback;
use std::future::Future;

/// Capability surface of a remote storage provider.
///
/// Entries are addressed by opaque ids. Every higher level operation in this
/// crate (archiving, compressing, bulk upload) is written against this trait.
pub trait RemoteStorage: Send + Sync {
    /// Look an entry up by id. `Ok(None)` when it does not exist.
    fn get_by_id(&self, id: &str) -> impl Future<Output = Result<Option<RemoteEntry>>> + Send;

    /// List one page of the direct children of `folder_id`.
    ///
    /// Pass the previous page's `next_page_token` to continue; the listing is
    /// complete once a page comes back without one.
    fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<ChildPage>> + Send;

    /// Download the content of a file. `Ok(None)` means there is nothing to
    /// download and the caller should skip the entry.
    fn download_content(&self, file_id: &str)
    -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Create an empty entry of the given mime type under each parent.
    /// Returns the id created under the first parent.
    fn create_entry(
        &self,
        name: &str,
        mime_type: &str,
        parents: &[String],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Rename an entry in place and return its new state.
    fn update_name(
        &self,
        id: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<RemoteEntry>> + Send;

    /// Delete a file, or a folder together with everything below it.
    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Upload `content` as a new file called `name` under each parent.
    fn upload_content(
        &self,
        name: &str,
        content: Vec<u8>,
        parents: &[String],
        progress: Option<&ProgressCallback<'_>>,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Drain every page of a folder listing.
pub async fn list_all_children<S: RemoteStorage>(
    storage: &S,
    folder_id: &str,
) -> Result<Vec<RemoteEntry>> {
    let mut entries = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = storage
            .list_children(folder_id, page_token.as_deref())
            .await?;
        entries.extend(page.entries);
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }
    Ok(entries)
}
