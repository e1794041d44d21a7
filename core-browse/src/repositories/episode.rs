//! Episode repository trait

use crate::error::Result;
use crate::models::{Episode, PodcastId};
use async_trait::async_trait;

/// Episode queries against the host's library database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EpisodeRepository: Send + Sync {
    /// Episodes of a podcast in the podcast's display order, unfiltered.
    async fn find_by_podcast_ordered(&self, podcast_id: &PodcastId) -> Result<Vec<Episode>>;

    /// All downloaded episodes, newest first.
    async fn downloaded(&self) -> Result<Vec<Episode>>;

    /// The most recently published episode the user has not played yet.
    async fn latest_unplayed(&self) -> Result<Option<Episode>>;

    /// The user's own uploaded files, parented by the synthetic files
    /// podcast.
    async fn user_files(&self) -> Result<Vec<Episode>>;
}
