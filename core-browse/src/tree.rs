//! # Media Browse Tree
//!
//! Resolves node ids to ordered child-node lists for external browse
//! surfaces (voice assistants, car displays). Reserved tokens address the
//! synthetic top-level nodes; every other node id is a podcast, playlist or
//! folder identifier.
//!
//! Resolutions are read-only except for one side channel: every episode
//! list resolution records where it came from in [`Settings`] so the resume
//! feature can continue from the same source later. That write never blocks
//! or fails a resolution.
//!
//! An unknown node id resolves to an empty list rather than an error; stale
//! ids linger in external surfaces long after the library changed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use core_runtime::config::{AutoPlaySource, Settings};
use tracing::{debug, warn};

use crate::error::{BrowseError, Result};
use crate::models::{
    Episode, FolderId, FolderItem, IconRef, MediaNode, Playlist, PlaylistId, Podcast, PodcastId,
};
use crate::repositories::{
    EpisodeRepository, FolderRepository, PlaylistRepository, PodcastRepository, RemoteSearch,
    UpNextRepository,
};

/// Reserved node id tokens.
pub const ROOT_NODE: &str = "__ROOT__";
pub const PODCASTS_NODE: &str = "__PODCASTS__";
pub const DOWNLOADS_NODE: &str = "__DOWNLOADS__";
pub const FILES_NODE: &str = "__FILES__";
pub const RECENT_NODE: &str = "__RECENT__";
pub const SUGGESTED_NODE: &str = "__SUGGESTED__";
pub const FOLDER_NODE_PREFIX: &str = "__FOLDER__";

/// Cap on episodes per resolved list; browse surfaces truncate around here
/// anyway.
const EPISODE_LIMIT: usize = 100;

/// Cap on the suggested node's item count.
const SUGGESTED_LIMIT: usize = 8;

/// The media browse tree. Cheap to share behind `Arc`; resolutions are
/// independent `&self` calls.
pub struct MediaTreeProvider {
    podcasts: Arc<dyn PodcastRepository>,
    episodes: Arc<dyn EpisodeRepository>,
    playlists: Arc<dyn PlaylistRepository>,
    up_next: Arc<dyn UpNextRepository>,
    folders: Arc<dyn FolderRepository>,
    remote: Arc<dyn RemoteSearch>,
    settings: Settings,
}

impl MediaTreeProvider {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        podcasts: Arc<dyn PodcastRepository>,
        episodes: Arc<dyn EpisodeRepository>,
        playlists: Arc<dyn PlaylistRepository>,
        up_next: Arc<dyn UpNextRepository>,
        folders: Arc<dyn FolderRepository>,
        remote: Arc<dyn RemoteSearch>,
        settings: Settings,
    ) -> Self {
        Self {
            podcasts,
            episodes,
            playlists,
            up_next,
            folders,
            remote,
            settings,
        }
    }

    /// Resolve a node id to its ordered children.
    pub async fn children(&self, node_id: &str) -> Result<Vec<MediaNode>> {
        debug!(node_id, "resolving browse node");
        match node_id {
            ROOT_NODE => self.root_children().await,
            PODCASTS_NODE => self.podcasts_children().await,
            RECENT_NODE => self.recent_children().await,
            SUGGESTED_NODE => self.suggested_children().await,
            FILES_NODE => self.files_children().await,
            _ => {
                if let Some(folder_id) = node_id.strip_prefix(FOLDER_NODE_PREFIX) {
                    self.folder_children(folder_id).await
                } else {
                    self.episode_children(node_id).await
                }
            }
        }
    }

    /// Top level: Podcasts, the user's smart playlists, Downloads, Files.
    /// Manual playlists and any playlist literally titled "video" are
    /// skipped; video filters make no sense on audio-only surfaces.
    async fn root_children(&self) -> Result<Vec<MediaNode>> {
        let mut nodes = vec![MediaNode::browsable(
            PODCASTS_NODE,
            "Podcasts",
            IconRef::Podcasts,
        )];

        for playlist in self.playlists.find_all().await? {
            if playlist.manual || playlist.title.eq_ignore_ascii_case("video") {
                continue;
            }
            nodes.push(MediaNode::from_playlist(&playlist));
        }

        nodes.push(MediaNode::browsable(
            DOWNLOADS_NODE,
            "Downloads",
            IconRef::Downloads,
        ));
        nodes.push(MediaNode::browsable(FILES_NODE, "Files", IconRef::Files));

        Ok(nodes)
    }

    /// The currently playing item, or a valid empty list.
    async fn recent_children(&self) -> Result<Vec<MediaNode>> {
        let episodes: Vec<Episode> = self.up_next.current_episode().await?.into_iter().collect();
        self.episodes_to_nodes(episodes).await
    }

    /// Up to eight unique episodes: the current item, the rest of the Up
    /// Next queue, the first smart playlist's episodes, then the latest
    /// unplayed episode as a last resort.
    async fn suggested_children(&self) -> Result<Vec<MediaNode>> {
        let mut episodes: Vec<Episode> = Vec::new();

        if let Some(current) = self.up_next.current_episode().await? {
            push_unique(&mut episodes, current);
        }
        for queued in self
            .up_next
            .queued_episodes()
            .await?
            .into_iter()
            .take(SUGGESTED_LIMIT - 1)
        {
            if episodes.len() >= SUGGESTED_LIMIT {
                break;
            }
            push_unique(&mut episodes, queued);
        }

        if episodes.len() < SUGGESTED_LIMIT {
            if let Some(top_playlist) = self.playlists.find_all().await?.into_iter().next() {
                for episode in self.playlists.episodes(&top_playlist.id).await? {
                    if episodes.len() >= SUGGESTED_LIMIT {
                        break;
                    }
                    push_unique(&mut episodes, episode);
                }
            }
        }

        if episodes.len() < SUGGESTED_LIMIT {
            if let Some(latest) = self.episodes.latest_unplayed().await? {
                push_unique(&mut episodes, latest);
            }
        }

        self.episodes_to_nodes(episodes).await
    }

    /// Paid-tier accounts browse their folder layout; everyone else gets
    /// the flat sorted subscription list.
    async fn podcasts_children(&self) -> Result<Vec<MediaNode>> {
        if self.settings.plus_subscriber() {
            let items = self.folders.home_folder().await?;
            Ok(items
                .iter()
                .map(|item| match item {
                    FolderItem::Folder(folder) => MediaNode::from_folder(folder),
                    FolderItem::Podcast(podcast) => MediaNode::from_podcast(podcast),
                })
                .collect())
        } else {
            let podcasts = self.podcasts.subscribed_sorted().await?;
            Ok(podcasts.iter().map(MediaNode::from_podcast).collect())
        }
    }

    async fn folder_children(&self, folder_id: &str) -> Result<Vec<MediaNode>> {
        if !self.settings.plus_subscriber() {
            return Ok(Vec::new());
        }
        let Ok(folder_id) = FolderId::from_string(folder_id) else {
            debug!(folder_id, "ignoring malformed folder node id");
            return Ok(Vec::new());
        };
        let podcasts = self.folders.folder_podcasts_sorted(&folder_id).await?;
        Ok(podcasts.iter().map(MediaNode::from_podcast).collect())
    }

    async fn files_children(&self) -> Result<Vec<MediaNode>> {
        self.settings.set_auto_play_source(AutoPlaySource::Files);
        let files = self.episodes.user_files().await?;
        let use_episode_artwork = self.settings.artwork_config().use_episode_artwork;
        let parent = Podcast::user_files();
        Ok(files
            .iter()
            .map(|episode| MediaNode::from_episode(episode, &parent, use_episode_artwork))
            .collect())
    }

    /// Episode listings: the downloads node, a smart playlist or a podcast.
    /// Unknown ids resolve to a valid empty list.
    async fn episode_children(&self, node_id: &str) -> Result<Vec<MediaNode>> {
        if node_id == DOWNLOADS_NODE {
            self.settings.set_auto_play_source(AutoPlaySource::Downloads);
            let episodes: Vec<Episode> = self
                .episodes
                .downloaded()
                .await?
                .into_iter()
                .take(EPISODE_LIMIT)
                .collect();
            return self.episodes_to_nodes(episodes).await;
        }

        self.settings
            .set_auto_play_source(AutoPlaySource::Id(node_id.to_string()));

        if let Ok(playlist_id) = PlaylistId::from_string(node_id) {
            if let Some(playlist) = self.playlists.find_by_id(&playlist_id).await? {
                return self.playlist_children(&playlist).await;
            }
            if let Some(podcast) = self.podcasts.find_by_id(&PodcastId(playlist_id.0)).await? {
                return self.podcast_children(&podcast).await;
            }
        }

        debug!(node_id, "unknown browse node id");
        Ok(Vec::new())
    }

    async fn playlist_children(&self, playlist: &Playlist) -> Result<Vec<MediaNode>> {
        let episodes: Vec<Episode> = self
            .playlists
            .episodes(&playlist.id)
            .await?
            .into_iter()
            .take(EPISODE_LIMIT)
            .collect();
        self.episodes_to_nodes(episodes).await
    }

    async fn podcast_children(&self, podcast: &Podcast) -> Result<Vec<MediaNode>> {
        let show_played = self.settings.auto_show_played();
        let mut episodes: Vec<Episode> = self
            .episodes
            .find_by_podcast_ordered(&podcast.id)
            .await?
            .into_iter()
            .filter(|episode| show_played || !(episode.played || episode.archived))
            .take(EPISODE_LIMIT)
            .collect();

        if !podcast.subscribed {
            // Bring trailers to the top; the sort is stable so everything
            // else keeps the podcast's order.
            episodes.sort_by_key(|episode| !episode.is_trailer());
        }

        let use_episode_artwork = self.settings.artwork_config().use_episode_artwork;
        Ok(episodes
            .iter()
            .map(|episode| MediaNode::from_episode(episode, podcast, use_episode_artwork))
            .collect())
    }

    /// Convert episodes to nodes under their parent podcasts. An episode
    /// whose podcast is missing from the library is skipped, not fatal.
    async fn episodes_to_nodes(&self, episodes: Vec<Episode>) -> Result<Vec<MediaNode>> {
        let use_episode_artwork = self.settings.artwork_config().use_episode_artwork;
        let mut parents: HashMap<PodcastId, Option<Podcast>> = HashMap::new();
        let mut nodes = Vec::with_capacity(episodes.len());

        for episode in &episodes {
            if !parents.contains_key(&episode.podcast_id) {
                let found = if episode.podcast_id == PodcastId::USER_FILES {
                    Some(Podcast::user_files())
                } else {
                    self.podcasts.find_by_id(&episode.podcast_id).await?
                };
                parents.insert(episode.podcast_id, found);
            }
            match parents.get(&episode.podcast_id).and_then(Option::as_ref) {
                Some(podcast) => {
                    nodes.push(MediaNode::from_episode(episode, podcast, use_episode_artwork));
                }
                None => {
                    debug!(episode_id = %episode.id, "skipping episode with no known podcast");
                }
            }
        }

        Ok(nodes)
    }

    /// Search subscribed podcasts locally, unioned with the remote
    /// directory for terms longer than one character.
    ///
    /// A remote failure degrades to local-only results; it becomes a hard
    /// [`BrowseError::SearchFailed`] only when there is nothing local to
    /// show either, because "no results" and "something went wrong" render
    /// differently on the host.
    pub async fn search(&self, term: &str) -> Result<Vec<MediaNode>> {
        let term = term.trim();
        let needle = term.to_lowercase();

        let mut local: Vec<Podcast> = self
            .podcasts
            .subscribed()
            .await?
            .into_iter()
            .filter(|podcast| {
                podcast.title.to_lowercase().contains(&needle)
                    || podcast.author.to_lowercase().contains(&needle)
            })
            .collect();
        local.sort_by_key(|podcast| clean_title_for_sort(&podcast.title));

        let remote = if term.chars().count() <= 1 {
            Vec::new()
        } else {
            match self.remote.search(term).await {
                Ok(results) => results,
                Err(e) => {
                    warn!("remote podcast search failed: {e}");
                    if local.is_empty() {
                        return Err(BrowseError::SearchFailed(e.to_string()));
                    }
                    Vec::new()
                }
            }
        };

        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for podcast in local.into_iter().chain(remote) {
            if seen.insert(podcast.id) {
                nodes.push(MediaNode::from_podcast(&podcast));
            }
        }
        Ok(nodes)
    }
}

fn push_unique(episodes: &mut Vec<Episode>, episode: Episode) {
    if episodes.iter().all(|existing| existing.id != episode.id) {
        episodes.push(episode);
    }
}

/// Sort key that ignores leading articles, so "The Daily" files under D.
fn clean_title_for_sort(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    for article in ["the ", "an ", "a "] {
        if let Some(rest) = lowered.strip_prefix(article) {
            return rest.to_string();
        }
    }
    lowered
}
