//! # Playback Coordinator
//!
//! Owns every foreground-service and playing-notification decision. The
//! host feeds playback state and metadata changes from its media session
//! callbacks; artwork configuration changes arrive through the settings
//! watch channel. The coordinator combines the latest value of each input,
//! drops redundant signals, builds a notification off-loop and applies the
//! resulting foreground/notification transition.
//!
//! ## Concurrency model
//!
//! A single event loop task owns all mutable coordination state. Intake is
//! an unbounded mpsc channel, so host callbacks never block. Notification
//! builds may perform I/O and run as spawned tasks; at most one build is in
//! flight, with at most one pending signal behind it. When a build finishes
//! and a newer signal is pending, the finished build's result is discarded
//! unapplied, so the last signal always wins.
//!
//! ## Signal suppression
//!
//! A combined signal is dropped without any work when the playback status
//! variant, the metadata item id and the artwork configuration all equal
//! the last acted-upon signal, the service is foreground and the status is
//! active (playing or buffering). Anything else is processed, because a
//! dismissed or missing notification must be recoverable from the next
//! signal. Transient pauses with a visible notification are skipped before
//! any build is dispatched, and a transient pause never becomes the
//! comparison baseline; the identical resumed signal after an interruption
//! would otherwise survive suppression and rebuild the notification for
//! nothing.

use std::sync::Arc;

use bridge_traits::{
    ForegroundController, Notification, NotificationId, NotificationSink, StopMode,
};
use core_runtime::config::Settings;
use core_runtime::events::{CoreEvent, EventBus, NoticeEvent, PlaybackEvent};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::notification::NotificationBuilder;
use crate::types::{CombinedSignal, ForegroundLifecycle, Metadata, PlaybackState, PlaybackStatus};

/// Consecutive foreground refusals after which the battery-optimization
/// notice is emitted.
const FOREGROUND_FAILURE_NOTICE_THRESHOLD: u32 = 3;

/// Warning showings queued per refused foreground start.
const BATTERY_WARNINGS_PER_REFUSAL: u32 = 2;

/// Everything the coordinator needs from the host and the runtime.
pub struct CoordinatorDeps {
    pub foreground: Arc<dyn ForegroundController>,
    pub notifications: Arc<dyn NotificationSink>,
    pub builder: Arc<dyn NotificationBuilder>,
    pub settings: Settings,
    pub events: EventBus,
}

enum IntakeEvent {
    State(PlaybackState),
    Metadata(Metadata),
    ArtworkChanged,
    BuildFinished {
        signal: CombinedSignal,
        notification: Option<Notification>,
    },
    Settle(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to the running coordinator loop.
///
/// Methods are callable from synchronous host callbacks; they enqueue and
/// return immediately. Events sent after [`shutdown`](Self::shutdown) are
/// dropped.
pub struct PlaybackCoordinator {
    tx: mpsc::UnboundedSender<IntakeEvent>,
    cancel: CancellationToken,
    lifecycle_rx: watch::Receiver<ForegroundLifecycle>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackCoordinator {
    /// Spawn the coordinator loop on the current tokio runtime.
    pub fn spawn(deps: CoordinatorDeps) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        // Forward artwork configuration changes into the intake channel so
        // the loop stays single-threaded over its state.
        let mut artwork_rx = deps.settings.watch_artwork_config();
        let watcher_tx = tx.clone();
        let watcher_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = watcher_cancel.cancelled() => break,
                    changed = artwork_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if watcher_tx.send(IntakeEvent::ArtworkChanged).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let (lifecycle_tx, lifecycle_rx) = watch::channel(ForegroundLifecycle::NotForeground);
        let coordinator_loop = CoordinatorLoop::new(deps, tx.clone(), lifecycle_tx);
        let handle = tokio::spawn(coordinator_loop.run(rx));

        Self {
            tx,
            cancel,
            lifecycle_rx,
            loop_handle: Mutex::new(Some(handle)),
        }
    }

    /// The coordinator's current view of the foreground lifecycle.
    pub fn lifecycle(&self) -> ForegroundLifecycle {
        *self.lifecycle_rx.borrow()
    }

    /// Observe foreground lifecycle transitions.
    pub fn watch_lifecycle(&self) -> watch::Receiver<ForegroundLifecycle> {
        self.lifecycle_rx.clone()
    }

    /// The engine reported a playback state change.
    pub fn playback_state_changed(&self, state: PlaybackState) {
        self.send(IntakeEvent::State(state));
    }

    /// The media session's current item metadata changed.
    pub fn metadata_changed(&self, metadata: Metadata) {
        self.send(IntakeEvent::Metadata(metadata));
    }

    /// Wait until every signal received so far has been fully applied,
    /// including any in-flight notification build.
    pub async fn settle(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(IntakeEvent::Settle(done_tx));
        let _ = done_rx.await;
    }

    /// Stop the loop, tearing down any visible notification.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let _ = self.tx.send(IntakeEvent::Shutdown);
        let handle = self.loop_handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("coordinator loop ended abnormally: {e}");
            }
        }
    }

    fn send(&self, event: IntakeEvent) {
        if self.tx.send(event).is_err() {
            debug!("coordinator stopped, dropping intake event");
        }
    }
}

/// Identity of a combined signal for suppression purposes.
#[derive(Debug, Clone)]
struct SignalKey {
    status: PlaybackStatus,
    item_id: Option<String>,
    use_episode_artwork: bool,
}

impl SignalKey {
    fn of(signal: &CombinedSignal) -> Self {
        Self {
            status: signal.state.status.clone(),
            item_id: signal
                .metadata
                .as_ref()
                .map(|m| m.item_id.as_str().to_string()),
            use_episode_artwork: signal.artwork.use_episode_artwork,
        }
    }

    fn matches(&self, other: &SignalKey) -> bool {
        self.status.same_kind(&other.status)
            && self.item_id == other.item_id
            && self.use_episode_artwork == other.use_episode_artwork
    }
}

struct CoordinatorLoop {
    foreground: Arc<dyn ForegroundController>,
    notifications: Arc<dyn NotificationSink>,
    builder: Arc<dyn NotificationBuilder>,
    settings: Settings,
    events: EventBus,
    tx: mpsc::UnboundedSender<IntakeEvent>,

    latest_state: Option<PlaybackState>,
    latest_metadata: Option<Metadata>,
    acted_upon: Option<SignalKey>,
    build_in_flight: bool,
    pending: Option<CombinedSignal>,
    lifecycle_tx: watch::Sender<ForegroundLifecycle>,
    foreground_failures: u32,
    settle_waiters: Vec<oneshot::Sender<()>>,
}

impl CoordinatorLoop {
    fn new(
        deps: CoordinatorDeps,
        tx: mpsc::UnboundedSender<IntakeEvent>,
        lifecycle_tx: watch::Sender<ForegroundLifecycle>,
    ) -> Self {
        Self {
            foreground: deps.foreground,
            notifications: deps.notifications,
            builder: deps.builder,
            settings: deps.settings,
            events: deps.events,
            tx,
            latest_state: None,
            latest_metadata: None,
            acted_upon: None,
            build_in_flight: false,
            pending: None,
            lifecycle_tx,
            foreground_failures: 0,
            settle_waiters: Vec::new(),
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<IntakeEvent>) {
        info!("playback coordinator started");
        while let Some(event) = rx.recv().await {
            match event {
                IntakeEvent::State(state) => {
                    self.latest_state = Some(state);
                    self.on_signal().await;
                }
                IntakeEvent::Metadata(metadata) => {
                    self.latest_metadata = Some(metadata);
                    self.on_signal().await;
                }
                IntakeEvent::ArtworkChanged => {
                    self.on_signal().await;
                }
                IntakeEvent::BuildFinished {
                    signal,
                    notification,
                } => {
                    self.build_in_flight = false;
                    if let Some(newer) = self.pending.take() {
                        debug!("discarding superseded notification build");
                        self.dispatch_build(newer);
                    } else {
                        self.apply(signal, notification).await;
                    }
                }
                IntakeEvent::Settle(done) => {
                    self.settle_waiters.push(done);
                }
                IntakeEvent::Shutdown => break,
            }
            self.release_settle_waiters();
        }

        self.teardown().await;
        info!("playback coordinator stopped");
    }

    fn release_settle_waiters(&mut self) {
        if !self.build_in_flight && self.pending.is_none() {
            for waiter in self.settle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    /// Combine the latest input values and decide whether this signal needs
    /// any work. Nothing is emitted until the first state change arrives;
    /// metadata is allowed to lag behind it.
    async fn on_signal(&mut self) {
        let Some(state) = self.latest_state.clone() else {
            return;
        };
        let signal = CombinedSignal {
            state,
            metadata: self.latest_metadata.clone(),
            artwork: self.settings.artwork_config(),
        };

        let key = SignalKey::of(&signal);
        if let Some(acted) = &self.acted_upon {
            if acted.matches(&key)
                && signal.state.status.is_active()
                && self.foreground.is_foreground().await
            {
                debug!(status = ?signal.state.status, "suppressing redundant playback signal");
                return;
            }
        }

        // A transient pause keeps whatever is on screen; rebuilding the
        // notification for it would be pure churn. Without a visible
        // notification it still goes through the full path so the next
        // signal can recover one.
        if signal.state.is_transient_pause()
            && self.notifications.is_showing(NotificationId::PLAYING).await
        {
            debug!("transient pause with visible notification, skipping rebuild");
            return;
        }

        if !signal.state.is_transient_pause() {
            self.acted_upon = Some(key);
        }

        if self.build_in_flight {
            self.pending = Some(signal);
        } else {
            self.dispatch_build(signal);
        }
    }

    fn dispatch_build(&mut self, signal: CombinedSignal) {
        self.build_in_flight = true;
        let builder = self.builder.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let notification = match builder
                .build(&signal.state, signal.metadata.as_ref(), &signal.artwork)
                .await
            {
                Ok(notification) => notification,
                Err(e) => {
                    warn!("notification build failed: {e}");
                    None
                }
            };
            let _ = tx.send(IntakeEvent::BuildFinished {
                signal,
                notification,
            });
        });
    }

    /// Apply a built notification to the foreground/notification state.
    ///
    /// The ordering here is deliberate and fragile. An already-visible
    /// notification is always refreshed in place first, and for an active
    /// foreground state that refresh is the whole job. Only afterwards do
    /// the promotion and demotion branches run.
    async fn apply(&mut self, signal: CombinedSignal, notification: Option<Notification>) {
        let is_foreground = self.foreground.is_foreground().await;
        let is_showing = self.notifications.is_showing(NotificationId::PLAYING).await;
        let state = &signal.state;

        if let Some(n) = &notification {
            if is_showing {
                debug!(item_id = %n.item_id, "updating playing notification in place");
                if let Err(e) = self
                    .notifications
                    .notify(NotificationId::PLAYING, n.clone())
                    .await
                {
                    warn!("notification update failed: {e}");
                }
                if is_foreground && state.status.is_active() {
                    return;
                }
            }
        }

        match &state.status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering => {
                let Some(n) = notification else {
                    info!("no notification available, staying out of foreground");
                    return;
                };
                self.enter_foreground(n).await;
            }
            PlaybackStatus::Paused
            | PlaybackStatus::Stopped
            | PlaybackStatus::None
            | PlaybackStatus::Error { .. } => {
                let remove = !matches!(state.status, PlaybackStatus::Paused)
                    || self.settings.hide_notification_on_pause();

                if remove || is_foreground {
                    if state.is_transient_pause() {
                        debug!("transient pause, keeping notification and foreground state");
                        return;
                    }

                    if let Some(n) = notification {
                        if matches!(state.status, PlaybackStatus::Paused) && is_foreground {
                            if let Err(e) =
                                self.notifications.notify(NotificationId::PLAYING, n).await
                            {
                                warn!("paused notification update failed: {e}");
                            }
                        }
                    }

                    let mode = if remove {
                        StopMode::Remove
                    } else {
                        StopMode::Detach
                    };
                    if let Err(e) = self.foreground.exit_foreground(mode).await {
                        warn!("foreground exit failed: {e}");
                    }
                    self.lifecycle_tx
                        .send_replace(ForegroundLifecycle::NotForeground);

                    if remove {
                        if let Err(e) = self.notifications.cancel(NotificationId::PLAYING).await {
                            warn!("notification cancel failed: {e}");
                        }
                        self.events
                            .emit(CoreEvent::Playback(PlaybackEvent::NotificationCleared))
                            .ok();
                    }
                }

                if let PlaybackStatus::Error { code, message } = &state.status {
                    error!(code = ?code, "playback engine error: {message}");
                    self.events
                        .emit(CoreEvent::Playback(PlaybackEvent::Error {
                            code: *code,
                            message: message.clone(),
                        }))
                        .ok();
                }
            }
        }
    }

    async fn enter_foreground(&mut self, notification: Notification) {
        let item_id = notification.item_id.clone();
        match self.foreground.try_enter_foreground(notification).await {
            Ok(()) => {
                info!(item_id = %item_id, "entered foreground with playing notification");
                self.lifecycle_tx.send_replace(ForegroundLifecycle::Foreground);
                self.events
                    .emit(CoreEvent::Playback(PlaybackEvent::ForegroundEntered {
                        item_id,
                    }))
                    .ok();
            }
            Err(denied) => {
                self.lifecycle_tx
                    .send_replace(ForegroundLifecycle::AttemptFailed);
                self.foreground_failures += 1;
                self.settings
                    .add_battery_warnings(BATTERY_WARNINGS_PER_REFUSAL);
                warn!(
                    failures = self.foreground_failures,
                    "foreground start refused: {denied}"
                );
                self.events
                    .emit(CoreEvent::Playback(PlaybackEvent::ForegroundRefused {
                        reason: denied.to_string(),
                        failures: self.foreground_failures,
                    }))
                    .ok();
                if self.foreground_failures == FOREGROUND_FAILURE_NOTICE_THRESHOLD {
                    self.events
                        .emit(CoreEvent::Notice(NoticeEvent::BatteryOptimizationWarning {
                            failures: self.foreground_failures,
                        }))
                        .ok();
                }
            }
        }
    }

    /// Best-effort teardown on shutdown so no stale notification outlives
    /// the coordinator.
    async fn teardown(&mut self) {
        if let Err(e) = self.foreground.exit_foreground(StopMode::Remove).await {
            debug!("foreground exit during shutdown failed: {e}");
        }
        if let Err(e) = self.notifications.cancel(NotificationId::PLAYING).await {
            debug!("notification cancel during shutdown failed: {e}");
        }
        self.lifecycle_tx
            .send_replace(ForegroundLifecycle::NotForeground);
        for waiter in self.settle_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}
