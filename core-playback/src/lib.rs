//! # Core Playback Module
//!
//! Background playback coordination for the podcast core:
//! - [`PlaybackCoordinator`] owns foreground-service and playing-notification
//!   transitions, driven by combined playback signals
//! - [`SleepTimer`] counts down to an automatic pause with a volume fade
//! - [`NotificationBuilder`] turns signals into platform-neutral
//!   notifications
//!
//! The host wires its media session callbacks into the coordinator handle
//! and implements the `bridge-traits` contracts; everything else happens
//! inside the core.

pub mod coordinator;
pub mod error;
pub mod notification;
pub mod sleep_timer;
pub mod types;

pub use coordinator::{CoordinatorDeps, PlaybackCoordinator};
pub use error::{PlaybackError, Result};
pub use notification::{BasicNotificationBuilder, NotificationBuilder};
pub use sleep_timer::{SleepTimer, SleepTimerState, FADE_DURATION};
pub use types::{
    CombinedSignal, ForegroundLifecycle, ItemId, Metadata, PlaybackState, PlaybackStatus,
};
