//! # Event Bus System
//!
//! Event-driven plumbing for the playback core using `tokio::sync::broadcast`.
//! The coordinator and the sleep timer publish here; hosts subscribe to
//! render user-visible notices (toasts, warning prompts) and to observe
//! playback lifecycle transitions without reaching into coordinator state.
//!
//! ## Overview
//!
//! - **Event Types**: strongly-typed enums per domain
//!   ([`PlaybackEvent`], [`SleepTimerEvent`], [`NoticeEvent`])
//! - **EventBus**: central broadcast channel for publishing events
//! - **EventStream**: wrapper for consuming events with filtering
//! - Multiple subscribers listen independently; slow subscribers lag rather
//!   than block publishers
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, NoticeEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut notices = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Notice(NoticeEvent::SleepTimerStoppedPlayback))
//!     .ok();
//! ```
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` produces two receive errors:
//!
//! - `RecvError::Lagged(n)`: the subscriber missed `n` events. Non-fatal,
//!   keep receiving.
//! - `RecvError::Closed`: all senders dropped. Treat as shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall behind by more than this receive
/// `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback lifecycle events (foreground transitions, errors).
    Playback(PlaybackEvent),
    /// Sleep timer lifecycle events.
    SleepTimer(SleepTimerEvent),
    /// User-visible notices the host should render.
    Notice(NoticeEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::SleepTimer(e) => e.description(),
            CoreEvent::Notice(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::ForegroundRefused { .. }) => EventSeverity::Warning,
            CoreEvent::Notice(_) => EventSeverity::Info,
            CoreEvent::SleepTimer(SleepTimerEvent::Expired) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events describing foreground/notification lifecycle transitions driven by
/// the playback coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The service entered the foreground with a playing notification.
    ForegroundEntered {
        /// Item the attached notification describes.
        item_id: String,
    },
    /// The platform refused a foreground start.
    ForegroundRefused {
        /// Human-readable refusal reason from the platform.
        reason: String,
        /// Consecutive refusals observed in this coordinator run.
        failures: u32,
    },
    /// The playing notification was removed and the service left the
    /// foreground.
    NotificationCleared,
    /// The playback engine reported an error state.
    Error {
        /// Engine error code, if one was supplied.
        code: Option<i32>,
        /// Human-readable error message.
        message: String,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::ForegroundEntered { .. } => "Entered foreground",
            PlaybackEvent::ForegroundRefused { .. } => "Foreground start refused",
            PlaybackEvent::NotificationCleared => "Playing notification cleared",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Sleep Timer Events
// ============================================================================

/// Events describing the sleep timer countdown lifecycle.
///
/// Second-by-second countdown state is not published here; observe the
/// timer's `watch` channel for that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SleepTimerEvent {
    /// A countdown started or was restarted with a fresh duration.
    Started {
        /// Full countdown duration in milliseconds.
        duration_ms: i64,
    },
    /// The countdown was cancelled before expiry.
    Cancelled,
    /// The pre-expiry volume fade began.
    FadeStarted {
        /// Fade duration in milliseconds.
        duration_ms: i64,
    },
    /// The countdown reached zero and playback was paused.
    Expired,
}

impl SleepTimerEvent {
    fn description(&self) -> &str {
        match self {
            SleepTimerEvent::Started { .. } => "Sleep timer started",
            SleepTimerEvent::Cancelled => "Sleep timer cancelled",
            SleepTimerEvent::FadeStarted { .. } => "Sleep timer fade started",
            SleepTimerEvent::Expired => "Sleep timer expired",
        }
    }
}

// ============================================================================
// Notice Events
// ============================================================================

/// User-visible notices. The host renders these (toast, snackbar, prompt);
/// the core only decides when they are warranted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NoticeEvent {
    /// "The sleep timer stopped your podcast."
    SleepTimerStoppedPlayback,
    /// Repeated foreground-start refusals suggest battery optimization is
    /// killing the service; guide the user to the OS setting.
    BatteryOptimizationWarning {
        /// Refusals observed when the threshold was crossed.
        failures: u32,
    },
}

impl NoticeEvent {
    fn description(&self) -> &str {
        match self {
            NoticeEvent::SleepTimerStoppedPlayback => "Sleep timer stopped playback",
            NoticeEvent::BatteryOptimizationWarning { .. } => "Battery optimization warning",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - multiple producers (clone the `EventBus`)
/// - multiple consumers (each `subscribe()` creates a new receiver)
/// - non-blocking sends (events are cloned per subscriber)
/// - lagging detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none. Publishers treat "no subscribers" as
    /// harmless: `bus.emit(event).ok()`.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber receiving all future events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, CoreEvent};
///
/// let event_bus = EventBus::new(100);
/// let notices = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Notice(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter; only matching events are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, `RecvError::Closed` when all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
