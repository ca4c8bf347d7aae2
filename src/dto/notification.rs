use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::format_system_time,
    state::{game::Minigame, notification::NoticeView},
};

/// Score popup as shown on the consoles.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    /// Scored participant, also set when it no longer exists.
    pub participant_id: String,
    pub participant_name: String,
    pub points: i64,
    pub reason: String,
    pub game_type: Minigame,
    /// RFC 3339 timestamp.
    pub shown_at: String,
}

impl From<NoticeView> for NotificationDto {
    fn from(view: NoticeView) -> Self {
        Self {
            participant_id: view.participant_id,
            participant_name: view.participant_name,
            points: view.points,
            reason: view.reason,
            game_type: view.game_type,
            shown_at: format_system_time(view.shown_at),
        }
    }
}

/// Response of `GET /notification`; `notification` is null when nothing is showing.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub notification: Option<NotificationDto>,
}

/// Response of `POST /notification/dismiss`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DismissResponse {
    /// Whether a notice was on screen.
    pub dismissed: bool,
}
