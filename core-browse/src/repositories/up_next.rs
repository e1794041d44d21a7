//! Up Next queue repository trait

use crate::error::Result;
use crate::models::Episode;
use async_trait::async_trait;

/// Read access to the Up Next playback queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpNextRepository: Send + Sync {
    /// The episode currently loaded into the player, if any.
    async fn current_episode(&self) -> Result<Option<Episode>>;

    /// Queued episodes in play order, excluding the current one.
    async fn queued_episodes(&self) -> Result<Vec<Episode>>;
}
