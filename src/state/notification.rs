use std::{
    sync::{
        Arc, Mutex, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, SystemTime},
};

use tokio::{
    runtime::Handle,
    sync::watch,
    task::AbortHandle,
    time::{Instant, sleep_until},
};
use tracing::debug;

use crate::state::{
    channel::{EventChannel, GameEvent, Subscription, Topic},
    game::{GameState, Minigame, ScoreUpdate},
};

/// Default lifetime of a score popup.
pub const DEFAULT_NOTIFICATION_WINDOW: Duration = Duration::from_millis(3_000);
/// Name displayed when the scored participant no longer exists.
pub const UNKNOWN_PARTICIPANT: &str = "Unknown";

/// Score popup currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Monotonic sequence number, used to tell a superseded notice from the current one.
    pub seq: u64,
    /// Update that raised the popup.
    pub update: ScoreUpdate,
    /// Wall-clock time the popup appeared.
    pub shown_at: SystemTime,
    /// Point after which the popup is no longer displayed.
    pub expires_at: Instant,
}

/// Notice resolved against a game snapshot, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    /// Participant the points were meant for.
    pub participant_id: String,
    /// Participant display name, or [`UNKNOWN_PARTICIPANT`].
    pub participant_name: String,
    /// Signed points.
    pub points: i64,
    /// Reason text.
    pub reason: String,
    /// Minigame the points went to.
    pub game_type: Minigame,
    /// Wall-clock time the popup appeared.
    pub shown_at: SystemTime,
}

impl Notice {
    /// Resolve the participant name against `state`.
    pub fn resolve(&self, state: &GameState) -> NoticeView {
        let participant_name = state
            .participant(&self.update.participant_id)
            .map(|participant| participant.name.clone())
            .unwrap_or_else(|| UNKNOWN_PARTICIPANT.to_string());

        NoticeView {
            participant_id: self.update.participant_id.clone(),
            participant_name,
            points: self.update.points,
            reason: self.update.reason.clone(),
            game_type: self.update.game_type,
            shown_at: self.shown_at,
        }
    }
}

/// Single-slot, self-expiring projection of the latest score update.
///
/// A new update replaces whatever is showing and restarts the countdown. Cloning the overlay
/// shares the same slot.
#[derive(Clone)]
pub struct NotificationOverlay {
    inner: Arc<OverlayInner>,
}

struct OverlayInner {
    window: Duration,
    slot: watch::Sender<Option<Notice>>,
    seq: AtomicU64,
    timer: Mutex<Option<AbortHandle>>,
}

impl NotificationOverlay {
    /// Create an overlay whose notices expire after `window`.
    pub fn new(window: Duration) -> Self {
        let (slot, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(OverlayInner {
                window,
                slot,
                seq: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to score updates on `channel`.
    pub fn attach(&self, channel: &dyn EventChannel) -> Subscription {
        let overlay = self.clone();
        channel.subscribe(
            Topic::ScoreUpdate,
            Arc::new(move |event: &GameEvent| {
                if let GameEvent::ScoreUpdate(update) = event {
                    overlay.show(update.clone());
                }
            }),
        )
    }

    /// Display `update`, replacing the current notice.
    pub fn show(&self, update: ScoreUpdate) {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let expires_at = Instant::now() + self.inner.window;
        self.inner.slot.send_replace(Some(Notice {
            seq,
            update,
            shown_at: SystemTime::now(),
            expires_at,
        }));

        let timer = match Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::downgrade(&self.inner);
                Some(runtime.spawn(expire_at(inner, seq, expires_at)).abort_handle())
            }
            Err(_) => {
                debug!(seq, "no runtime for notification timer; relying on read-time expiry");
                None
            }
        };
        self.inner.replace_timer(timer);
    }

    /// Hide the current notice before its window elapses.
    ///
    /// Watchers are only woken when something was actually on screen.
    pub fn dismiss(&self) -> bool {
        self.inner.replace_timer(None);
        self.inner.slot.send_if_modified(|slot| slot.take().is_some())
    }

    /// Notice currently on screen, if it has not expired.
    pub fn current(&self) -> Option<Notice> {
        let now = Instant::now();
        self.inner
            .slot
            .borrow()
            .as_ref()
            .filter(|notice| notice.expires_at > now)
            .cloned()
    }

    /// Receiver notified whenever a notice appears or disappears.
    pub fn watch(&self) -> watch::Receiver<Option<Notice>> {
        self.inner.slot.subscribe()
    }
}

impl OverlayInner {
    fn replace_timer(&self, timer: Option<AbortHandle>) {
        let mut guard = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = std::mem::replace(&mut *guard, timer) {
            previous.abort();
        }
    }

    fn expire(&self, seq: u64) {
        self.slot.send_if_modified(|slot| match slot {
            Some(notice) if notice.seq == seq => {
                slot.take();
                true
            }
            _ => false,
        });
    }
}

impl Drop for OverlayInner {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

async fn expire_at(inner: Weak<OverlayInner>, seq: u64, deadline: Instant) {
    sleep_until(deadline).await;
    if let Some(inner) = inner.upgrade() {
        inner.expire(seq);
    }
}
