//! Remote podcast search trait

use crate::error::Result;
use crate::models::Podcast;
use async_trait::async_trait;

/// Server-side podcast search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteSearch: Send + Sync {
    /// Search the directory for podcasts matching `term`.
    async fn search(&self, term: &str) -> Result<Vec<Podcast>>;
}
