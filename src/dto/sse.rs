use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{game::GameStateSnapshot, notification::NotificationDto};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast whenever the game snapshot is replaced, and first on every new stream.
pub struct StateChangedEvent(pub GameStateSnapshot);

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Broadcast when a score popup appears or is superseded.
pub struct NotificationShownEvent(pub NotificationDto);

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the score popup disappears, by expiry or dismissal.
pub struct NotificationDismissedEvent {
    pub dismissed: bool,
}
