//! # Settings
//!
//! In-memory, observable user settings consumed by the playback core.
//!
//! Persistence is the host's concern: the host loads stored preferences,
//! seeds a [`Settings`] instance, and writes changes back on its own side.
//! Inside the core, values that feed live pipelines (artwork configuration,
//! hide-on-pause) are exposed through `tokio::sync::watch` so the playback
//! coordinator can react to mid-playback preference changes; the rest are
//! plain thread-safe values read at decision time.
//!
//! `Settings` is cheaply cloneable; clones share state.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// How episode artwork is sourced for notifications and media nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkConfig {
    /// Prefer per-episode artwork over the podcast's cover art.
    pub use_episode_artwork: bool,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            use_episode_artwork: false,
        }
    }
}

/// Where an automatically started playback session drew its episodes from.
///
/// Recorded when the browse tree resolves an episode list so the resume
/// feature can continue from the same source later. The identifier variant
/// carries a playlist or podcast uuid string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoPlaySource {
    Downloads,
    Files,
    Id(String),
}

#[derive(Debug)]
struct SettingsInner {
    artwork_tx: watch::Sender<ArtworkConfig>,
    hide_on_pause_tx: watch::Sender<bool>,
    auto_show_played: RwLock<bool>,
    plus_subscriber: RwLock<bool>,
    battery_warning_count: Mutex<u32>,
    auto_play_source: Mutex<Option<AutoPlaySource>>,
}

/// Shared handle to the core's user settings.
#[derive(Debug, Clone)]
pub struct Settings {
    inner: Arc<SettingsInner>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        let (artwork_tx, _) = watch::channel(ArtworkConfig::default());
        let (hide_on_pause_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(SettingsInner {
                artwork_tx,
                hide_on_pause_tx,
                auto_show_played: RwLock::new(false),
                plus_subscriber: RwLock::new(false),
                battery_warning_count: Mutex::new(0),
                auto_play_source: Mutex::new(None),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Artwork configuration
    // ------------------------------------------------------------------

    /// Current artwork configuration.
    pub fn artwork_config(&self) -> ArtworkConfig {
        *self.inner.artwork_tx.borrow()
    }

    /// Replace the artwork configuration, waking observers.
    pub fn set_artwork_config(&self, config: ArtworkConfig) {
        self.inner.artwork_tx.send_replace(config);
    }

    /// Observe artwork configuration changes.
    pub fn watch_artwork_config(&self) -> watch::Receiver<ArtworkConfig> {
        self.inner.artwork_tx.subscribe()
    }

    // ------------------------------------------------------------------
    // Notification behavior
    // ------------------------------------------------------------------

    /// Whether the playing notification is removed on a real (non-transient)
    /// pause instead of staying visible in paused form.
    pub fn hide_notification_on_pause(&self) -> bool {
        *self.inner.hide_on_pause_tx.borrow()
    }

    pub fn set_hide_notification_on_pause(&self, hide: bool) {
        self.inner.hide_on_pause_tx.send_replace(hide);
    }

    pub fn watch_hide_notification_on_pause(&self) -> watch::Receiver<bool> {
        self.inner.hide_on_pause_tx.subscribe()
    }

    // ------------------------------------------------------------------
    // Browse behavior
    // ------------------------------------------------------------------

    /// Whether finished/archived episodes appear in browsed episode lists.
    pub fn auto_show_played(&self) -> bool {
        *self.inner.auto_show_played.read()
    }

    pub fn set_auto_show_played(&self, show: bool) {
        *self.inner.auto_show_played.write() = show;
    }

    /// Whether the account has the paid tier that enables folder browsing.
    pub fn plus_subscriber(&self) -> bool {
        *self.inner.plus_subscriber.read()
    }

    pub fn set_plus_subscriber(&self, plus: bool) {
        *self.inner.plus_subscriber.write() = plus;
    }

    // ------------------------------------------------------------------
    // Battery optimization warning
    // ------------------------------------------------------------------

    /// How many more times the battery-optimization warning should be shown.
    pub fn battery_warning_count(&self) -> u32 {
        *self.inner.battery_warning_count.lock()
    }

    /// Queue additional showings of the battery-optimization warning.
    pub fn add_battery_warnings(&self, additional: u32) {
        let mut count = self.inner.battery_warning_count.lock();
        *count += additional;
    }

    /// Consume one queued warning showing, if any remain.
    pub fn take_battery_warning(&self) -> bool {
        let mut count = self.inner.battery_warning_count.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Auto-play source tracking
    // ------------------------------------------------------------------

    /// Record the source of the most recently browsed episode list.
    ///
    /// Called by the browse tree; must never fail or block node resolution.
    pub fn set_auto_play_source(&self, source: AutoPlaySource) {
        *self.inner.auto_play_source.lock() = Some(source);
    }

    /// The most recently recorded auto-play source.
    pub fn auto_play_source(&self) -> Option<AutoPlaySource> {
        self.inner.auto_play_source.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::new();
        assert!(!settings.artwork_config().use_episode_artwork);
        assert!(!settings.hide_notification_on_pause());
        assert!(!settings.auto_show_played());
        assert!(!settings.plus_subscriber());
        assert_eq!(settings.battery_warning_count(), 0);
        assert!(settings.auto_play_source().is_none());
    }

    #[test]
    fn clones_share_state() {
        let settings = Settings::new();
        let clone = settings.clone();

        settings.set_hide_notification_on_pause(true);
        assert!(clone.hide_notification_on_pause());

        clone.set_auto_play_source(AutoPlaySource::Downloads);
        assert_eq!(settings.auto_play_source(), Some(AutoPlaySource::Downloads));
    }

    #[tokio::test]
    async fn artwork_watch_observes_changes() {
        let settings = Settings::new();
        let mut rx = settings.watch_artwork_config();

        settings.set_artwork_config(ArtworkConfig {
            use_episode_artwork: true,
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow().use_episode_artwork);
    }

    #[test]
    fn battery_warning_counter() {
        let settings = Settings::new();
        settings.add_battery_warnings(2);
        settings.add_battery_warnings(2);
        assert_eq!(settings.battery_warning_count(), 4);

        assert!(settings.take_battery_warning());
        assert_eq!(settings.battery_warning_count(), 3);

        for _ in 0..3 {
            assert!(settings.take_battery_warning());
        }
        assert!(!settings.take_battery_warning());
    }
}
