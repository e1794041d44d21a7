//! Folder repository trait

use crate::error::Result;
use crate::models::{FolderId, FolderItem, Podcast};
use async_trait::async_trait;

/// Folder layout queries. Folders are a paid-tier feature; the browse tree
/// only consults this repository for paid accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// The home-folder listing: top-level folders and loose podcasts, in the
    /// user's chosen order.
    async fn home_folder(&self) -> Result<Vec<FolderItem>>;

    /// Podcasts inside a folder, sorted.
    async fn folder_podcasts_sorted(&self, folder_id: &FolderId) -> Result<Vec<Podcast>>;
}
