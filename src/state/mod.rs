pub mod channel;
pub mod game;
pub mod ids;
pub mod media;
pub mod notification;
mod sse;
pub mod store;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::debug;

use crate::{
    config::AppConfig,
    dao::media_store::{ASSETS_MOUNT, DiskMediaStore, MediaStore},
    error::ServiceError,
};

pub use self::sse::SseHub;
use self::{
    channel::{EventChannel, GameEvent, LocalChannel},
    game::GameState,
    ids::ParticipantIds,
    notification::NotificationOverlay,
    store::GameStore,
};

/// Handle to the application state shared by every handler and background task.
pub type SharedState = Arc<AppState>;

/// Capacity of the live-sync broadcast channel.
const SSE_CAPACITY: usize = 64;

/// Central application state: the game store, the channel feeding it, and the media store.
pub struct AppState {
    config: Arc<AppConfig>,
    channel: Arc<dyn EventChannel>,
    store: Arc<GameStore>,
    notifications: NotificationOverlay,
    media: Arc<dyn MediaStore>,
    participant_ids: ParticipantIds,
    sse: SseHub,
    dispatch_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// Uses the in-process channel and a disk-backed media store rooted at the configured
    /// assets directory.
    pub fn new(config: AppConfig) -> SharedState {
        let media = Arc::new(DiskMediaStore::new(config.assets_dir().clone(), ASSETS_MOUNT));
        Self::with_parts(config, Arc::new(LocalChannel::new()), media)
    }

    /// Construct the state around an explicit channel and media store implementation.
    pub fn with_parts(
        config: AppConfig,
        channel: Arc<dyn EventChannel>,
        media: Arc<dyn MediaStore>,
    ) -> SharedState {
        let store = Arc::new(GameStore::new(GameState::with_participants(
            config.participants().iter().cloned(),
        )));
        store.attach(channel.as_ref());

        let notifications = NotificationOverlay::new(config.notification_window());
        notifications.attach(channel.as_ref());

        Arc::new(Self {
            config: Arc::new(config),
            channel,
            store,
            notifications,
            media,
            participant_ids: ParticipantIds::new(),
            sse: SseHub::new(SSE_CAPACITY),
            dispatch_gate: Mutex::new(()),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    /// Current game snapshot.
    pub fn snapshot(&self) -> Arc<GameState> {
        self.store.snapshot()
    }

    /// Receiver notified whenever the game snapshot is replaced.
    pub fn watch_game(&self) -> watch::Receiver<Arc<GameState>> {
        self.store.watch()
    }

    /// Score popup projection.
    pub fn notifications(&self) -> &NotificationOverlay {
        &self.notifications
    }

    /// Media store used for uploads and listings.
    pub fn media_store(&self) -> Arc<dyn MediaStore> {
        Arc::clone(&self.media)
    }

    /// Broadcast hub used for the live-sync SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Allocate a fresh participant identifier.
    pub fn next_participant_id(&self) -> String {
        self.participant_ids.next_id()
    }

    /// Publish `event`, waiting for any in-flight publish to finish its fan-out first.
    ///
    /// Returns the snapshot the event produced.
    pub async fn dispatch(&self, event: GameEvent) -> Arc<GameState> {
        let _gate = self.dispatch_gate.lock().await;
        self.publish(&event);
        self.store.snapshot()
    }

    /// Publish `event` only if `check` accepts the snapshot it would apply to.
    ///
    /// The check and the publish happen under the same gate, so no other event can slip in
    /// between them.
    pub async fn dispatch_if<F>(
        &self,
        event: GameEvent,
        check: F,
    ) -> Result<Arc<GameState>, ServiceError>
    where
        F: FnOnce(&GameState) -> Result<(), ServiceError>,
    {
        let _gate = self.dispatch_gate.lock().await;
        check(&self.store.snapshot())?;
        self.publish(&event);
        Ok(self.store.snapshot())
    }

    fn publish(&self, event: &GameEvent) {
        let handlers = self.channel.publish(event);
        debug!(topic = ?event.topic(), handlers, "published game event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::media::MediaKind;

    #[tokio::test]
    async fn with_parts_uses_the_prepared_media_store() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("assets");
        let media = DiskMediaStore::new(&root, ASSETS_MOUNT);
        media.ensure_layout().await.unwrap();
        std::fs::write(root.join("images").join("1-a.png"), b"a").unwrap();

        let state = AppState::with_parts(
            AppConfig::default().with_assets_dir(dir.path().join("elsewhere")),
            Arc::new(LocalChannel::new()),
            Arc::new(media),
        );

        assert!(state.media_store().health_check().await.is_ok());
        let listed = state.media_store().list(MediaKind::Image).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].url, "/assets/images/1-a.png");
    }
}
