//! Smart playlist repository trait

use crate::error::Result;
use crate::models::{Episode, Playlist, PlaylistId};
use async_trait::async_trait;

/// Smart playlist (filter) queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// All playlists in display order, including manual ones.
    async fn find_all(&self) -> Result<Vec<Playlist>>;

    /// Find a playlist by id.
    async fn find_by_id(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Episodes currently matching the playlist's filter, in filter order.
    async fn episodes(&self, id: &PlaylistId) -> Result<Vec<Episode>>;
}
