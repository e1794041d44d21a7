use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by the playback coordination layer.
///
/// Both variants are recoverable: the coordinator logs the failure and
/// treats the signal as having produced no notification, so the pipeline
/// keeps running on subsequent signals.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Building a notification for the current signal failed, e.g. an
    /// artwork fetch error in a host-provided builder.
    #[error("Notification build failed: {0}")]
    NotificationBuild(String),

    /// A host bridge call failed.
    #[error("Bridge call failed: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
