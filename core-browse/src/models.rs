//! Domain models for the browsable podcast library
//!
//! Read-only views over the host's library database. The browse tree never
//! mutates these; persistence and sync live on the host side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a podcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodcastId(pub Uuid);

impl PodcastId {
    /// Synthetic podcast that groups the user's own uploaded files.
    pub const USER_FILES: PodcastId = PodcastId(Uuid::nil());

    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PodcastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an episode or user file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeId(pub Uuid);

impl EpisodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a smart playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistId(pub Uuid);

impl PlaylistId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PlaylistId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a podcast folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub Uuid);

impl FolderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// A podcast the library knows about, subscribed or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub title: String,
    pub author: String,
    pub subscribed: bool,
}

impl Podcast {
    /// The synthetic podcast that parents the user's uploaded files.
    pub fn user_files() -> Self {
        Self {
            id: PodcastId::USER_FILES,
            title: "Files".to_string(),
            author: String::new(),
            subscribed: true,
        }
    }
}

/// Episode classification from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeType {
    Regular,
    Trailer,
    Bonus,
}

/// An episode row, including user files (parented by the synthetic
/// [`Podcast::user_files`] podcast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub podcast_id: PodcastId,
    pub title: String,
    pub episode_type: EpisodeType,
    pub duration: Option<Duration>,
    pub published_at: Option<DateTime<Utc>>,
    pub played: bool,
    pub archived: bool,
    pub downloaded: bool,
}

impl Episode {
    pub fn new(podcast_id: PodcastId, title: impl Into<String>) -> Self {
        Self {
            id: EpisodeId::new(),
            podcast_id,
            title: title.into(),
            episode_type: EpisodeType::Regular,
            duration: None,
            published_at: None,
            played: false,
            archived: false,
            downloaded: false,
        }
    }

    pub fn is_trailer(&self) -> bool {
        matches!(self.episode_type, EpisodeType::Trailer)
    }
}

/// A smart playlist (filter). Manual playlists are excluded from browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    pub manual: bool,
}

/// A folder grouping podcasts, available to paid-tier accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
}

/// One entry of the home-folder listing: either a folder or a loose podcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderItem {
    Folder(Folder),
    Podcast(Podcast),
}

// =============================================================================
// Media Nodes
// =============================================================================

/// Icon to render for a media node. Built-in icons are host assets; artwork
/// references are resolved by the host against its image cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconRef {
    Podcasts,
    Downloads,
    Files,
    Playlist,
    PodcastArtwork(PodcastId),
    EpisodeArtwork(EpisodeId),
}

/// An entry in the browsable content tree exposed to external surfaces
/// (voice assistants, car displays). Produced on demand, never persisted;
/// the `id` alone is enough to resolve the node's children later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaNode {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub browsable: bool,
    pub icon: IconRef,
}

impl MediaNode {
    pub fn browsable(id: impl Into<String>, title: impl Into<String>, icon: IconRef) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            browsable: true,
            icon,
        }
    }

    pub fn playable(id: impl Into<String>, title: impl Into<String>, icon: IconRef) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            browsable: false,
            icon,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// A podcast node; browsing into it lists the podcast's episodes.
    pub fn from_podcast(podcast: &Podcast) -> Self {
        Self::browsable(
            podcast.id.to_string(),
            podcast.title.clone(),
            IconRef::PodcastArtwork(podcast.id),
        )
        .with_subtitle(podcast.author.clone())
    }

    /// An episode node under its parent podcast. Which artwork it points at
    /// follows the user's artwork preference.
    pub fn from_episode(episode: &Episode, podcast: &Podcast, use_episode_artwork: bool) -> Self {
        let icon = if use_episode_artwork {
            IconRef::EpisodeArtwork(episode.id)
        } else {
            IconRef::PodcastArtwork(podcast.id)
        };
        Self::playable(episode.id.to_string(), episode.title.clone(), icon)
            .with_subtitle(podcast.title.clone())
    }

    pub fn from_playlist(playlist: &Playlist) -> Self {
        Self::browsable(
            playlist.id.to_string(),
            playlist.title.clone(),
            IconRef::Playlist,
        )
    }

    pub fn from_folder(folder: &Folder) -> Self {
        Self::browsable(
            format!("{}{}", crate::tree::FOLDER_NODE_PREFIX, folder.id),
            folder.name.clone(),
            IconRef::Podcasts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_files_podcast_has_reserved_id() {
        let podcast = Podcast::user_files();
        assert_eq!(podcast.id, PodcastId::USER_FILES);
        assert_eq!(podcast.id.to_string(), Uuid::nil().to_string());
    }

    #[test]
    fn episode_node_artwork_follows_preference() {
        let podcast = Podcast {
            id: PodcastId::new(),
            title: "Some Podcast".to_string(),
            author: "Author".to_string(),
            subscribed: true,
        };
        let episode = Episode::new(podcast.id, "Episode One");

        let podcast_art = MediaNode::from_episode(&episode, &podcast, false);
        assert_eq!(podcast_art.icon, IconRef::PodcastArtwork(podcast.id));
        assert!(!podcast_art.browsable);

        let episode_art = MediaNode::from_episode(&episode, &podcast, true);
        assert_eq!(episode_art.icon, IconRef::EpisodeArtwork(episode.id));
    }

    #[test]
    fn folder_node_id_carries_prefix() {
        let folder = Folder {
            id: FolderId::new(),
            name: "News".to_string(),
        };
        let node = MediaNode::from_folder(&folder);
        assert!(node.id.starts_with(crate::tree::FOLDER_NODE_PREFIX));
        assert!(node.browsable);
    }
}
