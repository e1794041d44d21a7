//! Foreground Service Control
//!
//! Abstracts the host OS primitives for promoting the playback process to a
//! privileged foreground service and demoting it again.
//!
//! The platform-specific failure mode (the OS refusing a foreground start
//! from the background) is isolated here as a typed error so the core can
//! treat it as a recoverable policy refusal instead of a crash.
//!
//! # Contract
//!
//! - Calls are never made concurrently; the playback coordinator serializes
//!   every transition.
//! - `try_enter_foreground` is idempotent with respect to an already
//!   foreground service: re-entering updates the attached notification.
//! - `is_foreground` reflects real OS state and may disagree with what the
//!   core last requested (e.g. the OS demoted the service on its own).

use crate::error::Result;
use crate::notification::Notification;

/// Reason the platform refused to enter the foreground.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ForegroundDenied {
    /// The OS disallows foreground starts from the app's current state
    /// (e.g. background start restrictions on recent Android releases).
    #[error("foreground start not allowed from background: {0}")]
    BackgroundStartNotAllowed(String),

    /// Any other platform refusal.
    #[error("platform refused foreground start: {0}")]
    Platform(String),
}

/// How to leave the foreground state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Demote the service and remove its notification.
    Remove,
    /// Demote the service but leave the notification visible. The OS may
    /// then kill the process without the notification disappearing.
    Detach,
}

/// Host-side foreground service switch.
#[async_trait::async_trait]
pub trait ForegroundController: Send + Sync {
    /// Attempt to promote the service to foreground with the given
    /// notification attached.
    ///
    /// A refusal is an expected outcome under background start restrictions
    /// and must be returned as [`ForegroundDenied`], never panicked.
    async fn try_enter_foreground(
        &self,
        notification: Notification,
    ) -> std::result::Result<(), ForegroundDenied>;

    /// Demote the service from foreground.
    ///
    /// Must be a no-op when the service is not foreground.
    async fn exit_foreground(&self, mode: StopMode) -> Result<()>;

    /// Whether the service is foreground right now, per the OS.
    async fn is_foreground(&self) -> bool;
}
