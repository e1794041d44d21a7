//! Player Control Surface
//!
//! The narrow command surface the core uses to drive the external audio
//! engine. The engine itself (decode, render, audio focus) is out of scope;
//! commands issued here come back around as ordinary playback state changes
//! observed by the coordinator, which keeps notification and foreground
//! decisions single-writer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Who asked for a pause. Recorded by the engine for analytics and used to
/// distinguish user pauses from automatic ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseSource {
    /// Explicit user action (notification button, UI, headset).
    User,
    /// Automatic pause, e.g. sleep timer expiry.
    AutoPause,
    /// Temporary interruption such as a transient audio focus loss.
    TransientFocusLoss,
}

/// Commands into the external audio engine.
#[async_trait::async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Pause playback, attributing the pause to `source`.
    async fn pause(&self, source: PauseSource) -> Result<()>;

    /// Fade the output volume to silence over `duration`.
    async fn fade_out(&self, duration: Duration) -> Result<()>;

    /// Restore the output volume after a fade.
    async fn restore_volume(&self) -> Result<()>;
}
