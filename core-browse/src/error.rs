use thiserror::Error;

/// Errors surfaced by the browse tree.
///
/// `SearchFailed` is deliberately distinct from an empty result list: the
/// host renders "no results" for an empty list and "something went wrong"
/// for a hard failure.
#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),
}

pub type Result<T> = std::result::Result<T, BrowseError>;
