//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each embedding
//! host of the podcast playback core.
//!
//! ## Overview
//!
//! This crate defines the contract between the core and the platform it is
//! embedded in. Each trait represents a capability the core requires but
//! that is implemented differently per host (phone, automotive head unit,
//! test harness).
//!
//! ## Traits
//!
//! - [`ForegroundController`](foreground::ForegroundController): promote or
//!   demote the OS foreground service, with the platform's refusal mode
//!   surfaced as a typed [`ForegroundDenied`](foreground::ForegroundDenied)
//! - [`NotificationSink`](notification::NotificationSink): post, replace
//!   and cancel the playing-media notification
//! - [`PlayerHandle`](player::PlayerHandle): the narrow command surface
//!   into the external audio engine (pause, fade, restore volume)
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError) except where a
//! more specific typed refusal exists (`ForegroundDenied`). Host
//! implementations should convert platform errors into these types with
//! actionable messages rather than panicking.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`; the core shares them across
//! async tasks behind `Arc`.

pub mod error;
pub mod foreground;
pub mod notification;
pub mod player;

pub use error::BridgeError;

// Re-export commonly used types
pub use foreground::{ForegroundController, ForegroundDenied, StopMode};
pub use notification::{Notification, NotificationAction, NotificationId, NotificationSink};
pub use player::{PauseSource, PlayerHandle};
