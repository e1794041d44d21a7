//! Media Notification Types and Sink
//!
//! Defines the platform-neutral notification value type and the sink trait
//! the host implements on top of its notification system.
//!
//! The core never talks to the OS notification manager directly. It builds a
//! [`Notification`] value and hands it to the [`NotificationSink`], which the
//! host wires to the real notification drawer (status bar, automotive
//! cluster, test recorder). Exact pixel layout is the host's concern.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Well-known notification slots used by the core.
///
/// At most one notification per id is active at any time; reposting to the
/// same id replaces the previous notification in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u32);

impl NotificationId {
    /// The playing-media notification. This is the notification attached to
    /// the foreground service while playback is active.
    pub const PLAYING: NotificationId = NotificationId(21_483);
}

/// Media actions a notification can expose as buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationAction {
    Play,
    Pause,
    SkipBack,
    SkipForward,
}

/// A platform-neutral media notification.
///
/// Carries everything the host needs to render a playback notification.
/// Artwork is pre-fetched by the notification builder and attached as raw
/// encoded image bytes; a missing artwork field means the host should fall
/// back to its default media icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification channel name the host registered for media playback.
    pub channel: String,
    /// Identifier of the item this notification describes.
    pub item_id: String,
    /// Primary line, usually the episode title.
    pub title: String,
    /// Secondary line, usually the podcast or author name.
    pub subtitle: Option<String>,
    /// Encoded artwork image, if the builder fetched one.
    pub artwork: Option<Bytes>,
    /// Action buttons in display order.
    pub actions: Vec<NotificationAction>,
    /// Whether the notification is non-dismissable while playback runs.
    pub ongoing: bool,
}

impl Notification {
    /// Create a minimal playing notification on the given channel.
    pub fn new(channel: impl Into<String>, item_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            item_id: item_id.into(),
            title: title.into(),
            subtitle: None,
            artwork: None,
            actions: Vec::new(),
            ongoing: false,
        }
    }

    /// Set the secondary line.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Attach encoded artwork bytes.
    pub fn with_artwork(mut self, artwork: Bytes) -> Self {
        self.artwork = Some(artwork);
        self
    }

    /// Set the action buttons.
    pub fn with_actions(mut self, actions: Vec<NotificationAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Mark the notification as ongoing (non-dismissable).
    pub fn ongoing(mut self, ongoing: bool) -> Self {
        self.ongoing = ongoing;
        self
    }
}

/// Host-side notification drawer.
///
/// Implementations must tolerate `cancel` for an id that is not showing and
/// `notify` reposting the same id; both are normal during rapid playback
/// state churn.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Post or replace the notification at `id`.
    async fn notify(&self, id: NotificationId, notification: Notification) -> Result<()>;

    /// Remove the notification at `id` if it is showing.
    async fn cancel(&self, id: NotificationId) -> Result<()>;

    /// Whether the notification at `id` is currently visible.
    ///
    /// This reflects real OS state: a user swipe-dismiss makes this return
    /// `false` even though the core never cancelled the notification.
    async fn is_showing(&self, id: NotificationId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let n = Notification::new("media.playback", "ep-1", "Episode One")
            .with_subtitle("Some Podcast")
            .with_actions(vec![NotificationAction::Pause, NotificationAction::SkipForward])
            .ongoing(true);

        assert_eq!(n.channel, "media.playback");
        assert_eq!(n.subtitle.as_deref(), Some("Some Podcast"));
        assert_eq!(n.actions.len(), 2);
        assert!(n.ongoing);
        assert!(n.artwork.is_none());
    }

    #[test]
    fn playing_id_is_stable() {
        assert_eq!(NotificationId::PLAYING, NotificationId(21_483));
    }
}
