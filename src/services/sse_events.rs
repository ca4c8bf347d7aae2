use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    dto::{
        game::GameStateSnapshot,
        notification::NotificationDto,
        sse::{NotificationDismissedEvent, NotificationShownEvent, ServerEvent, StateChangedEvent},
    },
    state::{AppState, SharedState, game::GameState, notification::Notice},
};

pub(crate) const EVENT_STATE_CHANGED: &str = "state.changed";
const EVENT_NOTIFICATION_SHOWN: &str = "notification.shown";
const EVENT_NOTIFICATION_DISMISSED: &str = "notification.dismissed";

/// Start the tasks bridging store and overlay updates onto the SSE hub.
///
/// Both watches are subscribed before returning, so no update published afterwards is missed.
/// The tasks only hold a weak reference to the state and stop once it is dropped.
pub fn spawn_forwarders(state: &SharedState) -> Vec<JoinHandle<()>> {
    let games = state.watch_game();
    let notices = state.notifications().watch();
    vec![
        tokio::spawn(forward_game_state(Arc::downgrade(state), games)),
        tokio::spawn(forward_notifications(Arc::downgrade(state), notices)),
    ]
}

async fn forward_game_state(
    state: Weak<AppState>,
    mut receiver: watch::Receiver<Arc<GameState>>,
) {
    while receiver.changed().await.is_ok() {
        let snapshot = receiver.borrow_and_update().clone();
        let Some(state) = state.upgrade() else {
            break;
        };
        broadcast_state_changed(&state, &snapshot);
    }
    debug!("game state forwarder stopped");
}

async fn forward_notifications(
    state: Weak<AppState>,
    mut receiver: watch::Receiver<Option<Notice>>,
) {
    while receiver.changed().await.is_ok() {
        let notice = receiver.borrow_and_update().clone();
        let Some(state) = state.upgrade() else {
            break;
        };
        match notice {
            Some(notice) => broadcast_notification_shown(&state, &notice),
            None => broadcast_notification_dismissed(&state),
        }
    }
    debug!("notification forwarder stopped");
}

/// Broadcast the full snapshot to every stream.
pub fn broadcast_state_changed(state: &SharedState, snapshot: &GameState) {
    let payload = StateChangedEvent(GameStateSnapshot::from(snapshot));
    send_event(state, EVENT_STATE_CHANGED, &payload);
}

/// Broadcast a newly shown score popup.
pub fn broadcast_notification_shown(state: &SharedState, notice: &Notice) {
    let view = notice.resolve(&state.snapshot());
    let payload = NotificationShownEvent(NotificationDto::from(view));
    send_event(state, EVENT_NOTIFICATION_SHOWN, &payload);
}

/// Broadcast that the score popup went away.
pub fn broadcast_notification_dismissed(state: &SharedState) {
    send_event(
        state,
        EVENT_NOTIFICATION_DISMISSED,
        &NotificationDismissedEvent { dismissed: true },
    );
}

/// Serialize `payload` as the named event before pushing it to the hub.
fn send_event<T: Serialize>(state: &SharedState, event: &str, payload: &T) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(message) => state.sse().broadcast(message),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
