//! Repository traits for the browse tree
//!
//! Query-only contracts the host implements on top of its library database
//! and sync layer. The browse tree composes these; it never writes through
//! them. All implementations must be `Send + Sync`.

mod episode;
mod folder;
mod playlist;
mod podcast;
mod search;
mod up_next;

pub use episode::EpisodeRepository;
pub use folder::FolderRepository;
pub use playlist::PlaylistRepository;
pub use podcast::PodcastRepository;
pub use search::RemoteSearch;
pub use up_next::UpNextRepository;

#[cfg(test)]
pub use episode::MockEpisodeRepository;
#[cfg(test)]
pub use folder::MockFolderRepository;
#[cfg(test)]
pub use playlist::MockPlaylistRepository;
#[cfg(test)]
pub use podcast::MockPodcastRepository;
#[cfg(test)]
pub use search::MockRemoteSearch;
#[cfg(test)]
pub use up_next::MockUpNextRepository;
