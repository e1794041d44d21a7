//! Browse tree resolution tests against an in-memory library.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use core_browse::repositories::{
    EpisodeRepository, FolderRepository, PlaylistRepository, PodcastRepository, RemoteSearch,
    UpNextRepository,
};
use core_browse::{
    Episode, EpisodeType, Folder, FolderId, FolderItem, MediaTreeProvider, Playlist, PlaylistId,
    Podcast, PodcastId, Result, DOWNLOADS_NODE, FILES_NODE, FOLDER_NODE_PREFIX, PODCASTS_NODE,
    RECENT_NODE, ROOT_NODE, SUGGESTED_NODE,
};
use core_runtime::config::{AutoPlaySource, Settings};

#[derive(Default)]
struct FakeLibrary {
    podcasts: Vec<Podcast>,
    episodes_by_podcast: HashMap<PodcastId, Vec<Episode>>,
    downloaded: Vec<Episode>,
    user_files: Vec<Episode>,
    latest_unplayed: Option<Episode>,
    playlists: Vec<Playlist>,
    playlist_episodes: HashMap<PlaylistId, Vec<Episode>>,
    current: Option<Episode>,
    queue: Vec<Episode>,
    home_folder: Vec<FolderItem>,
    folder_podcasts: HashMap<FolderId, Vec<Podcast>>,
    remote_results: Vec<Podcast>,
}

#[async_trait]
impl PodcastRepository for FakeLibrary {
    async fn find_by_id(&self, id: &PodcastId) -> Result<Option<Podcast>> {
        Ok(self.podcasts.iter().find(|p| p.id == *id).cloned())
    }

    async fn subscribed_sorted(&self) -> Result<Vec<Podcast>> {
        let mut subscribed: Vec<Podcast> = self
            .podcasts
            .iter()
            .filter(|p| p.subscribed)
            .cloned()
            .collect();
        subscribed.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(subscribed)
    }

    async fn subscribed(&self) -> Result<Vec<Podcast>> {
        Ok(self
            .podcasts
            .iter()
            .filter(|p| p.subscribed)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EpisodeRepository for FakeLibrary {
    async fn find_by_podcast_ordered(&self, podcast_id: &PodcastId) -> Result<Vec<Episode>> {
        Ok(self
            .episodes_by_podcast
            .get(podcast_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn downloaded(&self) -> Result<Vec<Episode>> {
        Ok(self.downloaded.clone())
    }

    async fn latest_unplayed(&self) -> Result<Option<Episode>> {
        Ok(self.latest_unplayed.clone())
    }

    async fn user_files(&self) -> Result<Vec<Episode>> {
        Ok(self.user_files.clone())
    }
}

#[async_trait]
impl PlaylistRepository for FakeLibrary {
    async fn find_all(&self) -> Result<Vec<Playlist>> {
        Ok(self.playlists.clone())
    }

    async fn find_by_id(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        Ok(self.playlists.iter().find(|p| p.id == *id).cloned())
    }

    async fn episodes(&self, id: &PlaylistId) -> Result<Vec<Episode>> {
        Ok(self.playlist_episodes.get(id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl UpNextRepository for FakeLibrary {
    async fn current_episode(&self) -> Result<Option<Episode>> {
        Ok(self.current.clone())
    }

    async fn queued_episodes(&self) -> Result<Vec<Episode>> {
        Ok(self.queue.clone())
    }
}

#[async_trait]
impl FolderRepository for FakeLibrary {
    async fn home_folder(&self) -> Result<Vec<FolderItem>> {
        Ok(self.home_folder.clone())
    }

    async fn folder_podcasts_sorted(&self, folder_id: &FolderId) -> Result<Vec<Podcast>> {
        Ok(self
            .folder_podcasts
            .get(folder_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl RemoteSearch for FakeLibrary {
    async fn search(&self, _term: &str) -> Result<Vec<Podcast>> {
        Ok(self.remote_results.clone())
    }
}

fn tree_with(library: FakeLibrary, settings: Settings) -> MediaTreeProvider {
    let library = Arc::new(library);
    MediaTreeProvider::new(
        library.clone(),
        library.clone(),
        library.clone(),
        library.clone(),
        library.clone(),
        library,
        settings,
    )
}

fn podcast(title: &str) -> Podcast {
    Podcast {
        id: PodcastId::new(),
        title: title.to_string(),
        author: "Author".to_string(),
        subscribed: true,
    }
}

fn playlist(title: &str, manual: bool) -> Playlist {
    Playlist {
        id: PlaylistId::new(),
        title: title.to_string(),
        manual,
    }
}

#[tokio::test]
async fn root_lists_podcasts_playlists_downloads_files_in_order() {
    let library = FakeLibrary {
        playlists: vec![
            playlist("New Releases", false),
            playlist("Video", false),
            playlist("Queue", true),
            playlist("In Progress", false),
        ],
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());

    let nodes = tree.children(ROOT_NODE).await.unwrap();
    let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
    // Manual playlists and the "video" filter are skipped.
    assert_eq!(
        titles,
        vec!["Podcasts", "New Releases", "In Progress", "Downloads", "Files"]
    );
    assert_eq!(nodes[0].id, PODCASTS_NODE);
    assert_eq!(nodes[3].id, DOWNLOADS_NODE);
    assert_eq!(nodes[4].id, FILES_NODE);
    assert!(nodes.iter().all(|n| n.browsable));
}

#[tokio::test]
async fn root_without_playlists_still_has_fixed_nodes() {
    let tree = tree_with(FakeLibrary::default(), Settings::new());
    let nodes = tree.children(ROOT_NODE).await.unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![PODCASTS_NODE, DOWNLOADS_NODE, FILES_NODE]);
}

#[tokio::test]
async fn suggested_prefers_up_next_and_caps_at_eight_unique() {
    let show = podcast("Show");
    let current = Episode::new(show.id, "Current");
    let queued: Vec<Episode> = (0..3)
        .map(|i| Episode::new(show.id, format!("Queued {i}")))
        .collect();
    let filter = playlist("New Releases", false);
    // The filter repeats the current episode and offers plenty more.
    let mut filter_episodes = vec![current.clone()];
    filter_episodes.extend((0..10).map(|i| Episode::new(show.id, format!("Filter {i}"))));

    let library = FakeLibrary {
        podcasts: vec![show.clone()],
        playlists: vec![filter.clone()],
        playlist_episodes: HashMap::from([(filter.id, filter_episodes)]),
        current: Some(current.clone()),
        queue: queued.clone(),
        latest_unplayed: Some(Episode::new(show.id, "Latest")),
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());

    let nodes = tree.children(SUGGESTED_NODE).await.unwrap();
    assert_eq!(nodes.len(), 8);

    let mut ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(nodes[0].id, current.id.to_string());
    assert_eq!(nodes[1].id, queued[0].id.to_string());
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

#[tokio::test]
async fn suggested_falls_back_to_latest_unplayed() {
    let show = podcast("Show");
    let latest = Episode::new(show.id, "Latest");
    let library = FakeLibrary {
        podcasts: vec![show],
        latest_unplayed: Some(latest.clone()),
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());

    let nodes = tree.children(SUGGESTED_NODE).await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, latest.id.to_string());
}

#[tokio::test]
async fn recent_is_current_item_or_valid_empty() {
    let show = podcast("Show");
    let current = Episode::new(show.id, "Current");
    let library = FakeLibrary {
        podcasts: vec![show],
        current: Some(current.clone()),
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());
    let nodes = tree.children(RECENT_NODE).await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, current.id.to_string());

    let empty_tree = tree_with(FakeLibrary::default(), Settings::new());
    let nodes = empty_tree.children(RECENT_NODE).await.unwrap();
    assert!(nodes.is_empty());
}

#[tokio::test]
async fn downloads_with_nothing_downloaded_is_valid_empty() {
    let settings = Settings::new();
    let tree = tree_with(FakeLibrary::default(), settings.clone());
    let nodes = tree.children(DOWNLOADS_NODE).await.unwrap();
    assert!(nodes.is_empty());
    assert_eq!(settings.auto_play_source(), Some(AutoPlaySource::Downloads));
}

#[tokio::test]
async fn podcast_node_filters_played_and_caps_episodes() {
    let show = podcast("Show");
    let mut episodes: Vec<Episode> = (0..130)
        .map(|i| Episode::new(show.id, format!("Episode {i}")))
        .collect();
    episodes[0].played = true;
    episodes[1].archived = true;

    let settings = Settings::new();
    let library = FakeLibrary {
        podcasts: vec![show.clone()],
        episodes_by_podcast: HashMap::from([(show.id, episodes)]),
        ..Default::default()
    };
    let tree = tree_with(library, settings.clone());

    let nodes = tree.children(&show.id.to_string()).await.unwrap();
    assert_eq!(nodes.len(), 100);
    assert_eq!(nodes[0].title, "Episode 2");
    assert_eq!(
        settings.auto_play_source(),
        Some(AutoPlaySource::Id(show.id.to_string()))
    );
}

#[tokio::test]
async fn podcast_node_shows_played_when_preference_set() {
    let show = podcast("Show");
    let mut episodes = vec![
        Episode::new(show.id, "Played"),
        Episode::new(show.id, "Fresh"),
    ];
    episodes[0].played = true;

    let settings = Settings::new();
    settings.set_auto_show_played(true);
    let library = FakeLibrary {
        podcasts: vec![show.clone()],
        episodes_by_podcast: HashMap::from([(show.id, episodes)]),
        ..Default::default()
    };
    let tree = tree_with(library, settings);

    let nodes = tree.children(&show.id.to_string()).await.unwrap();
    assert_eq!(nodes.len(), 2);
}

#[tokio::test]
async fn unsubscribed_podcast_floats_trailers_to_the_top() {
    let mut show = podcast("Show");
    show.subscribed = false;
    let mut episodes = vec![
        Episode::new(show.id, "Episode 1"),
        Episode::new(show.id, "Episode 2"),
        Episode::new(show.id, "Trailer"),
        Episode::new(show.id, "Episode 3"),
    ];
    episodes[2].episode_type = EpisodeType::Trailer;

    let library = FakeLibrary {
        podcasts: vec![show.clone()],
        episodes_by_podcast: HashMap::from([(show.id, episodes)]),
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());

    let nodes = tree.children(&show.id.to_string()).await.unwrap();
    let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Trailer", "Episode 1", "Episode 2", "Episode 3"]);
}

#[tokio::test]
async fn playlist_node_lists_filter_episodes_and_records_source() {
    let show = podcast("Show");
    let filter = playlist("New Releases", false);
    let episodes: Vec<Episode> = (0..3)
        .map(|i| Episode::new(show.id, format!("Episode {i}")))
        .collect();

    let settings = Settings::new();
    let library = FakeLibrary {
        podcasts: vec![show],
        playlists: vec![filter.clone()],
        playlist_episodes: HashMap::from([(filter.id, episodes)]),
        ..Default::default()
    };
    let tree = tree_with(library, settings.clone());

    let nodes = tree.children(&filter.id.to_string()).await.unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(
        settings.auto_play_source(),
        Some(AutoPlaySource::Id(filter.id.to_string()))
    );
}

#[tokio::test]
async fn files_node_lists_user_files_and_records_source() {
    let user_file = Episode::new(PodcastId::USER_FILES, "My Recording");
    let settings = Settings::new();
    let library = FakeLibrary {
        user_files: vec![user_file.clone()],
        ..Default::default()
    };
    let tree = tree_with(library, settings.clone());

    let nodes = tree.children(FILES_NODE).await.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].subtitle.as_deref(), Some("Files"));
    assert_eq!(settings.auto_play_source(), Some(AutoPlaySource::Files));
}

#[tokio::test]
async fn podcasts_node_is_flat_sorted_without_paid_tier() {
    let library = FakeLibrary {
        podcasts: vec![podcast("Zebra Show"), podcast("Alpha Show")],
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());

    let nodes = tree.children(PODCASTS_NODE).await.unwrap();
    let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha Show", "Zebra Show"]);
}

#[tokio::test]
async fn podcasts_node_uses_folder_layout_for_paid_tier() {
    let folder = Folder {
        id: FolderId::new(),
        name: "News".to_string(),
    };
    let loose = podcast("Loose Show");
    let inside = podcast("Inside Show");

    let settings = Settings::new();
    settings.set_plus_subscriber(true);
    let library = FakeLibrary {
        podcasts: vec![loose.clone(), inside.clone()],
        home_folder: vec![
            FolderItem::Folder(folder.clone()),
            FolderItem::Podcast(loose),
        ],
        folder_podcasts: HashMap::from([(folder.id, vec![inside.clone()])]),
        ..Default::default()
    };
    let tree = tree_with(library, settings);

    let nodes = tree.children(PODCASTS_NODE).await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].title, "News");
    assert!(nodes[0].id.starts_with(FOLDER_NODE_PREFIX));

    let folder_nodes = tree.children(&nodes[0].id).await.unwrap();
    assert_eq!(folder_nodes.len(), 1);
    assert_eq!(folder_nodes[0].title, "Inside Show");
}

#[tokio::test]
async fn unknown_node_ids_resolve_to_valid_empty() {
    let tree = tree_with(FakeLibrary::default(), Settings::new());
    // A uuid the library has never heard of.
    let nodes = tree.children(&PodcastId::new().to_string()).await.unwrap();
    assert!(nodes.is_empty());
    // A token that is not even a uuid.
    let nodes = tree.children("bogus-token").await.unwrap();
    assert!(nodes.is_empty());
}

#[tokio::test]
async fn episode_missing_its_podcast_is_skipped_not_fatal() {
    let orphan = Episode::new(PodcastId::new(), "Orphan");
    let library = FakeLibrary {
        downloaded: vec![orphan],
        ..Default::default()
    };
    let tree = tree_with(library, Settings::new());

    let nodes = tree.children(DOWNLOADS_NODE).await.unwrap();
    assert!(nodes.is_empty());
}
