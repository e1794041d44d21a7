//! Playback signal value types.
//!
//! These are the inputs the coordinator combines: the engine's playback
//! state, the current item metadata and the artwork configuration. The host
//! feeds the first two from its media session callbacks; the third arrives
//! through the settings watch channel.

use std::fmt;
use std::time::Duration;

use core_runtime::config::ArtworkConfig;
use serde::{Deserialize, Serialize};

/// Identifier of a playable item (episode or user file).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Engine playback status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No media session exists yet.
    None,
    /// Session exists but playback is stopped.
    Stopped,
    Paused,
    Playing,
    /// Loading or rebuffering; treated like playing for foreground purposes.
    Buffering,
    /// The engine reported a fatal playback error.
    Error {
        code: Option<i32>,
        message: String,
    },
}

impl PlaybackStatus {
    /// Whether two statuses are the same variant, ignoring error payloads.
    pub fn same_kind(&self, other: &PlaybackStatus) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// States that warrant a foreground service with an ongoing notification.
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackStatus::Playing | PlaybackStatus::Buffering)
    }
}

/// A playback state change reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Set for pauses caused by temporary interruptions (transient audio
    /// focus loss). Transient pauses never tear down the notification.
    pub is_transient: bool,
    /// Item the engine is currently playing, when known.
    pub playing_item_id: Option<ItemId>,
}

impl PlaybackState {
    pub fn new(status: PlaybackStatus) -> Self {
        Self {
            status,
            is_transient: false,
            playing_item_id: None,
        }
    }

    pub fn transient(mut self) -> Self {
        self.is_transient = true;
        self
    }

    pub fn with_item(mut self, item_id: ItemId) -> Self {
        self.playing_item_id = Some(item_id);
        self
    }

    pub fn is_transient_pause(&self) -> bool {
        self.is_transient && matches!(self.status, PlaybackStatus::Paused)
    }
}

/// Display metadata for the current item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub item_id: ItemId,
    pub title: String,
    /// Podcast or author name.
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

impl Metadata {
    pub fn new(item_id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
            artist: None,
            duration: None,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// The combined latest values of the three coordinator inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedSignal {
    pub state: PlaybackState,
    /// Metadata may lag behind the first state change; the coordinator does
    /// not wait for it.
    pub metadata: Option<Metadata>,
    pub artwork: ArtworkConfig,
}

/// Where the coordinator believes the service sits in the foreground
/// lifecycle. Advisory only; the OS remains the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForegroundLifecycle {
    NotForeground,
    Foreground,
    /// The last foreground start was refused by the platform.
    AttemptFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_kind_ignores_error_payload() {
        let a = PlaybackStatus::Error {
            code: Some(1),
            message: "decoder".into(),
        };
        let b = PlaybackStatus::Error {
            code: Some(2),
            message: "network".into(),
        };
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&PlaybackStatus::Playing));
    }

    #[test]
    fn transient_pause_detection() {
        let pause = PlaybackState::new(PlaybackStatus::Paused).transient();
        assert!(pause.is_transient_pause());

        let buffering = PlaybackState::new(PlaybackStatus::Buffering).transient();
        assert!(!buffering.is_transient_pause());

        let real_pause = PlaybackState::new(PlaybackStatus::Paused);
        assert!(!real_pause.is_transient_pause());
    }

    #[test]
    fn active_states() {
        assert!(PlaybackStatus::Playing.is_active());
        assert!(PlaybackStatus::Buffering.is_active());
        assert!(!PlaybackStatus::Paused.is_active());
        assert!(!PlaybackStatus::None.is_active());
    }
}
