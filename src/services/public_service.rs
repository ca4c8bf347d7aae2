use crate::{
    dto::{
        game::GameStateSnapshot,
        notification::{DismissResponse, NotificationDto, NotificationResponse},
    },
    state::SharedState,
};

/// Return the full game snapshot.
pub fn get_state(state: &SharedState) -> GameStateSnapshot {
    GameStateSnapshot::from(state.snapshot().as_ref())
}

/// Score popup currently on screen, if any.
pub fn current_notification(state: &SharedState) -> Option<NotificationDto> {
    let notice = state.notifications().current()?;
    Some(notice.resolve(&state.snapshot()).into())
}

/// Wrap [`current_notification`] for the REST response.
pub fn get_notification(state: &SharedState) -> NotificationResponse {
    NotificationResponse {
        notification: current_notification(state),
    }
}

/// Hide the score popup early.
pub fn dismiss_notification(state: &SharedState) -> DismissResponse {
    DismissResponse {
        dismissed: state.notifications().dismiss(),
    }
}
