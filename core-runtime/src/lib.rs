//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the podcast playback core:
//! - Logging and tracing configuration
//! - Observable user settings
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other core crates depend
//! on. It establishes the logging conventions, the settings-observation
//! pattern (`tokio::sync::watch`) and the event broadcasting mechanism used
//! throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{ArtworkConfig, AutoPlaySource, Settings};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream, NoticeEvent, PlaybackEvent, SleepTimerEvent};
