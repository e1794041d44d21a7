//! Playing-Notification Construction
//!
//! Turns a combined playback signal into the [`Notification`] value the host
//! renders. Builds run off the coordinator loop because they may perform
//! I/O (artwork fetch); the coordinator coalesces concurrent builds so only
//! the latest signal's notification is ever applied.
//!
//! A build that yields `Ok(None)` means "nothing to show": no metadata has
//! arrived yet, the item id is blank, or no media session exists. The
//! coordinator then skips foreground promotion for that signal.

use async_trait::async_trait;
use bridge_traits::{Notification, NotificationAction};
use core_runtime::config::ArtworkConfig;

use crate::error::Result;
use crate::types::{Metadata, PlaybackState, PlaybackStatus};

/// Strategy for producing the playing notification from the current signal.
///
/// Hosts that can fetch artwork implement this themselves, honoring
/// [`ArtworkConfig::use_episode_artwork`] when choosing the image source.
#[async_trait]
pub trait NotificationBuilder: Send + Sync {
    /// Build a notification for the signal, or `None` when there is nothing
    /// to show.
    async fn build(
        &self,
        state: &PlaybackState,
        metadata: Option<&Metadata>,
        artwork: &ArtworkConfig,
    ) -> Result<Option<Notification>>;
}

/// Text-only builder without artwork fetching.
///
/// Suitable for hosts without an artwork cache and for tests.
#[derive(Debug, Clone)]
pub struct BasicNotificationBuilder {
    channel: String,
}

impl BasicNotificationBuilder {
    /// `channel` is the host's registered media playback notification channel.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl NotificationBuilder for BasicNotificationBuilder {
    async fn build(
        &self,
        state: &PlaybackState,
        metadata: Option<&Metadata>,
        _artwork: &ArtworkConfig,
    ) -> Result<Option<Notification>> {
        if matches!(state.status, PlaybackStatus::None) {
            return Ok(None);
        }
        let Some(metadata) = metadata else {
            return Ok(None);
        };
        if metadata.item_id.is_empty() {
            return Ok(None);
        }

        let actions = if state.status.is_active() {
            vec![
                NotificationAction::SkipBack,
                NotificationAction::Pause,
                NotificationAction::SkipForward,
            ]
        } else {
            vec![
                NotificationAction::SkipBack,
                NotificationAction::Play,
                NotificationAction::SkipForward,
            ]
        };

        let mut notification = Notification::new(
            self.channel.clone(),
            metadata.item_id.as_str(),
            metadata.title.clone(),
        )
        .with_actions(actions)
        .ongoing(state.status.is_active());

        if let Some(artist) = &metadata.artist {
            notification = notification.with_subtitle(artist.clone());
        }

        Ok(Some(notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaybackState;

    fn artwork() -> ArtworkConfig {
        ArtworkConfig::default()
    }

    #[tokio::test]
    async fn no_metadata_builds_nothing() {
        let builder = BasicNotificationBuilder::new("media.playback");
        let state = PlaybackState::new(PlaybackStatus::Playing);
        let built = builder.build(&state, None, &artwork()).await.unwrap();
        assert!(built.is_none());
    }

    #[tokio::test]
    async fn blank_item_id_builds_nothing() {
        let builder = BasicNotificationBuilder::new("media.playback");
        let state = PlaybackState::new(PlaybackStatus::Playing);
        let metadata = Metadata::new("", "Untitled");
        let built = builder
            .build(&state, Some(&metadata), &artwork())
            .await
            .unwrap();
        assert!(built.is_none());
    }

    #[tokio::test]
    async fn playing_notification_is_ongoing_with_pause_action() {
        let builder = BasicNotificationBuilder::new("media.playback");
        let state = PlaybackState::new(PlaybackStatus::Playing);
        let metadata = Metadata::new("ep-1", "Episode One").with_artist("Some Podcast");
        let built = builder
            .build(&state, Some(&metadata), &artwork())
            .await
            .unwrap()
            .unwrap();

        assert!(built.ongoing);
        assert!(built.actions.contains(&NotificationAction::Pause));
        assert_eq!(built.subtitle.as_deref(), Some("Some Podcast"));
        assert_eq!(built.item_id, "ep-1");
    }

    #[tokio::test]
    async fn paused_notification_is_dismissable_with_play_action() {
        let builder = BasicNotificationBuilder::new("media.playback");
        let state = PlaybackState::new(PlaybackStatus::Paused);
        let metadata = Metadata::new("ep-1", "Episode One");
        let built = builder
            .build(&state, Some(&metadata), &artwork())
            .await
            .unwrap()
            .unwrap();

        assert!(!built.ongoing);
        assert!(built.actions.contains(&NotificationAction::Play));
    }
}
