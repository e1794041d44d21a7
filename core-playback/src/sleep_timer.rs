//! # Sleep Timer
//!
//! Countdown that pauses playback when it expires, with a volume fade over
//! the final seconds. The countdown runs on a one-second tokio interval;
//! remaining time is published through a `watch` channel so hosts can render
//! a live countdown without polling.
//!
//! Restarting a running timer replaces the remaining time, it never adds to
//! it. Cancellation is immediate: the cancelled flag is flipped under the
//! same lock the tick body checks first and publishes state under, so no
//! countdown side effect or state update is issued after `cancel` returns.
//!
//! The pause issued at expiry goes through the [`PlayerHandle`] and comes
//! back around as an ordinary playback state change; the timer never touches
//! notification or foreground state itself.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{PauseSource, PlayerHandle};
use core_runtime::events::{CoreEvent, EventBus, NoticeEvent, SleepTimerEvent};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Countdown tick granularity.
const TICK: Duration = Duration::from_secs(1);

/// Remaining time at or below which the volume fade starts.
const FADE_THRESHOLD_MS: i64 = 5_000;

/// Duration of the pre-expiry volume fade.
pub const FADE_DURATION: Duration = Duration::from_secs(5);

/// Published countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepTimerState {
    pub is_running: bool,
    /// Remaining time in milliseconds; zero when idle or expired.
    pub time_left_ms: i64,
}

impl SleepTimerState {
    const IDLE: SleepTimerState = SleepTimerState {
        is_running: false,
        time_left_ms: 0,
    };
}

struct CountdownShared {
    remaining_ms: i64,
    fade_fired: bool,
    finished: bool,
}

struct CountdownRun {
    shared: Arc<Mutex<CountdownShared>>,
    cancel: CancellationToken,
}

/// The sleep timer engine. Cheap to share behind `Arc`.
pub struct SleepTimer {
    player: Arc<dyn PlayerHandle>,
    events: EventBus,
    state_tx: watch::Sender<SleepTimerState>,
    run: Mutex<Option<CountdownRun>>,
}

impl SleepTimer {
    pub fn new(player: Arc<dyn PlayerHandle>, events: EventBus) -> Self {
        let (state_tx, _) = watch::channel(SleepTimerState::IDLE);
        Self {
            player,
            events,
            state_tx,
            run: Mutex::new(None),
        }
    }

    /// Observe countdown state changes.
    pub fn watch_state(&self) -> watch::Receiver<SleepTimerState> {
        self.state_tx.subscribe()
    }

    /// Current countdown state.
    pub fn state(&self) -> SleepTimerState {
        *self.state_tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state_tx.borrow().is_running
    }

    /// Start the countdown, or restart it with a fresh duration if already
    /// running. A restart replaces the remaining time and re-arms the fade.
    /// A zero duration is ignored.
    pub fn start(&self, duration: Duration) {
        if duration.is_zero() {
            debug!("ignoring sleep timer start with zero duration");
            return;
        }
        let duration_ms = duration.as_millis() as i64;

        let mut run = self.run.lock();

        if let Some(existing) = run.as_ref() {
            let mut shared = existing.shared.lock();
            if !shared.finished {
                shared.remaining_ms = duration_ms;
                shared.fade_fired = false;
                drop(shared);
                info!(duration_ms, "sleep timer restarted");
                self.publish_running(duration_ms);
                return;
            }
        }

        let shared = Arc::new(Mutex::new(CountdownShared {
            remaining_ms: duration_ms,
            fade_fired: false,
            finished: false,
        }));
        let cancel = CancellationToken::new();
        *run = Some(CountdownRun {
            shared: shared.clone(),
            cancel: cancel.clone(),
        });
        drop(run);

        info!(duration_ms, "sleep timer started");
        self.publish_running(duration_ms);

        tokio::spawn(countdown(
            shared,
            cancel,
            self.player.clone(),
            self.events.clone(),
            self.state_tx.clone(),
        ));
    }

    /// Cancel a running countdown. Does nothing if the timer is idle or has
    /// already expired.
    pub fn cancel(&self) {
        let mut run = self.run.lock();
        let Some(existing) = run.take() else {
            return;
        };

        let was_running = {
            let mut shared = existing.shared.lock();
            let was_running = !shared.finished;
            shared.finished = true;
            was_running
        };
        existing.cancel.cancel();

        if was_running {
            info!("sleep timer cancelled");
            self.state_tx.send_replace(SleepTimerState::IDLE);
            self.events
                .emit(CoreEvent::SleepTimer(SleepTimerEvent::Cancelled))
                .ok();
        }
    }

    fn publish_running(&self, time_left_ms: i64) {
        self.state_tx.send_replace(SleepTimerState {
            is_running: true,
            time_left_ms,
        });
        self.events
            .emit(CoreEvent::SleepTimer(SleepTimerEvent::Started {
                duration_ms: time_left_ms,
            }))
            .ok();
    }
}

struct TickOutcome {
    time_left_ms: i64,
    start_fade: bool,
    expired: bool,
}

async fn countdown(
    shared: Arc<Mutex<CountdownShared>>,
    cancel: CancellationToken,
    player: Arc<dyn PlayerHandle>,
    events: EventBus,
    state_tx: watch::Sender<SleepTimerState>,
) {
    let mut interval = time::interval(TICK);
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        // Decide and publish under the lock, act after releasing it. A
        // cancel that wins the lock first marks the run finished and this
        // tick does nothing; a cancel that loses it publishes the idle
        // state strictly after this tick's update.
        let outcome = {
            let mut shared = shared.lock();
            if shared.finished {
                break;
            }
            shared.remaining_ms -= TICK.as_millis() as i64;
            let time_left_ms = shared.remaining_ms;
            let start_fade =
                time_left_ms > 0 && time_left_ms <= FADE_THRESHOLD_MS && !shared.fade_fired;
            if start_fade {
                shared.fade_fired = true;
            }
            let expired = time_left_ms <= 0;
            if expired {
                shared.finished = true;
            }
            state_tx.send_replace(SleepTimerState {
                is_running: !expired,
                time_left_ms: time_left_ms.max(0),
            });
            TickOutcome {
                time_left_ms,
                start_fade,
                expired,
            }
        };

        if outcome.start_fade && !cancel.is_cancelled() {
            debug!(
                time_left_ms = outcome.time_left_ms,
                "starting sleep timer volume fade"
            );
            events
                .emit(CoreEvent::SleepTimer(SleepTimerEvent::FadeStarted {
                    duration_ms: FADE_DURATION.as_millis() as i64,
                }))
                .ok();
            if let Err(e) = player.fade_out(FADE_DURATION).await {
                warn!("sleep timer fade failed: {e}");
            }
        }

        if outcome.expired {
            if cancel.is_cancelled() {
                break;
            }
            info!("sleep timer expired, pausing playback");
            if let Err(e) = player.pause(PauseSource::AutoPause).await {
                warn!("sleep timer pause failed: {e}");
            }
            if let Err(e) = player.restore_volume().await {
                warn!("volume restore after sleep timer failed: {e}");
            }
            events
                .emit(CoreEvent::Notice(NoticeEvent::SleepTimerStoppedPlayback))
                .ok();
            events
                .emit(CoreEvent::SleepTimer(SleepTimerEvent::Expired))
                .ok();
            break;
        }
    }
}
