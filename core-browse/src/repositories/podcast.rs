//! Podcast repository trait

use crate::error::Result;
use crate::models::{Podcast, PodcastId};
use async_trait::async_trait;

/// Podcast lookups against the host's library database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    /// Find a podcast by id, subscribed or not.
    ///
    /// # Returns
    /// - `Ok(Some(podcast))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if the lookup itself fails
    async fn find_by_id(&self, id: &PodcastId) -> Result<Option<Podcast>>;

    /// Subscribed podcasts in the user's chosen sort order.
    async fn subscribed_sorted(&self) -> Result<Vec<Podcast>>;

    /// Subscribed podcasts in no particular order, for search filtering.
    async fn subscribed(&self) -> Result<Vec<Podcast>>;
}
