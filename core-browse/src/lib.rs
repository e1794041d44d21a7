//! # Core Browse Module
//!
//! The browsable media tree for external surfaces:
//! - [`MediaTreeProvider`] resolves node ids to child-node lists
//! - [`models`] hold the read-only library views it composes
//! - [`repositories`] define the query contracts the host implements
//!
//! The tree is consumed by voice assistants and car displays through the
//! host's media browser glue; it exposes only [`MediaNode`] values and
//! typed errors.

pub mod error;
pub mod models;
pub mod repositories;
pub mod tree;

pub use error::{BrowseError, Result};
pub use models::{
    Episode, EpisodeId, EpisodeType, Folder, FolderId, FolderItem, IconRef, MediaNode, Playlist,
    PlaylistId, Podcast, PodcastId,
};
pub use tree::{
    MediaTreeProvider, DOWNLOADS_NODE, FILES_NODE, FOLDER_NODE_PREFIX, PODCASTS_NODE, RECENT_NODE,
    ROOT_NODE, SUGGESTED_NODE,
};
