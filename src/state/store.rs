use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::state::{
    channel::{EventChannel, GameEvent, Subscription, Topic},
    game::GameState,
};

/// Holder of the authoritative [`GameState`] snapshot.
///
/// The snapshot is swapped as a whole on every change, so a reader holding an
/// `Arc<GameState>` always sees a consistent state. Updates only arrive through the
/// [`EventChannel`] the store is attached to.
pub struct GameStore {
    snapshot: watch::Sender<Arc<GameState>>,
}

impl GameStore {
    /// Create a store holding `initial`.
    pub fn new(initial: GameState) -> Self {
        let (snapshot, _rx) = watch::channel(Arc::new(initial));
        Self { snapshot }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<GameState> {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified every time the snapshot is replaced.
    pub fn watch(&self) -> watch::Receiver<Arc<GameState>> {
        self.snapshot.subscribe()
    }

    /// Register the reducers on every topic of `channel`.
    pub fn attach(self: &Arc<Self>, channel: &dyn EventChannel) -> Vec<Subscription> {
        Topic::ALL
            .into_iter()
            .map(|topic| {
                let store = Arc::clone(self);
                channel.subscribe(topic, Arc::new(move |event: &GameEvent| store.apply(event)))
            })
            .collect()
    }

    fn apply(&self, event: &GameEvent) {
        let replaced = self.snapshot.send_if_modified(|current| {
            match reduce(current, event) {
                Some(next) => {
                    *current = Arc::new(next);
                    true
                }
                None => false,
            }
        });

        if !replaced {
            debug!(topic = ?event.topic(), "event left game state unchanged");
        }
    }
}

/// Compute the snapshot following `event`, or `None` when nothing changes.
pub fn reduce(state: &GameState, event: &GameEvent) -> Option<GameState> {
    match event {
        GameEvent::ScoreUpdate(update) => state.score_update(update),
        GameEvent::ModeChange { mode, game } => Some(state.mode_change(*mode, *game)),
        GameEvent::ResetGame => Some(state.reset_game()),
        GameEvent::FinalizeGame => Some(state.finalize_game()),
        GameEvent::AddParticipant { id, name } => state.add_participant(id, name),
        GameEvent::RemoveParticipant { id } => state.remove_participant(id),
        GameEvent::MediaChange(media) => Some(state.media_change(media.clone())),
        GameEvent::ToggleFullscreen => Some(state.toggle_fullscreen()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        channel::LocalChannel,
        game::{GameMode, Minigame, Participant, ScoreUpdate},
        media::{MediaKind, SelectedMedia, rendered_media},
    };

    fn attached_store() -> (Arc<GameStore>, LocalChannel) {
        let channel = LocalChannel::new();
        let store = Arc::new(GameStore::new(GameState::with_participants([
            Participant::new("A", "Team A"),
            Participant::new("B", "Team B"),
        ])));
        store.attach(&channel);
        (store, channel)
    }

    #[test]
    fn published_events_replace_snapshot() {
        let (store, channel) = attached_store();
        let before = store.snapshot();

        channel.publish(&GameEvent::ScoreUpdate(ScoreUpdate {
            participant_id: "A".into(),
            points: 10,
            reason: "correct".into(),
            game_type: Minigame::Karaoke,
        }));
        let after = store.snapshot();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.participant("A").unwrap().current_score, 0);
        assert_eq!(after.participant("A").unwrap().current_score, 10);
    }

    #[test]
    fn unknown_id_keeps_same_snapshot() {
        let (store, channel) = attached_store();
        let before = store.snapshot();

        channel.publish(&GameEvent::ScoreUpdate(ScoreUpdate {
            participant_id: "nobody".into(),
            points: 10,
            reason: "ghost".into(),
            game_type: Minigame::Karaoke,
        }));
        channel.publish(&GameEvent::RemoveParticipant {
            id: "nobody".into(),
        });

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[tokio::test]
    async fn watchers_see_replacements() {
        let (store, channel) = attached_store();
        let mut rx = store.watch();

        channel.publish(&GameEvent::ToggleFullscreen);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_fullscreen);
    }

    #[test]
    fn media_gating_follows_mode() {
        let (store, channel) = attached_store();
        channel.publish(&GameEvent::ModeChange {
            mode: GameMode::Karaoke,
            game: Some(Minigame::Karaoke),
        });
        channel.publish(&GameEvent::MediaChange(Some(SelectedMedia::new(
            MediaKind::Image,
            "/assets/images/u.png",
        ))));

        let state = store.snapshot();
        assert_eq!(rendered_media(state.mode, state.selected_media.as_ref()), None);

        channel.publish(&GameEvent::ModeChange {
            mode: GameMode::GuessImage,
            game: Some(Minigame::GuessImage),
        });
        let state = store.snapshot();
        assert_eq!(
            rendered_media(state.mode, state.selected_media.as_ref()).map(|m| m.url.as_str()),
            Some("/assets/images/u.png")
        );
    }

    #[test]
    fn scenario_through_channel() {
        let (store, channel) = attached_store();

        channel.publish(&GameEvent::ScoreUpdate(ScoreUpdate {
            participant_id: "A".into(),
            points: 10,
            reason: "correct".into(),
            game_type: Minigame::Karaoke,
        }));
        let a = store.snapshot().participant("A").cloned().unwrap();
        assert_eq!((a.current_score, a.game_scores.karaoke), (10, 10));

        channel.publish(&GameEvent::FinalizeGame);
        let a = store.snapshot().participant("A").cloned().unwrap();
        assert_eq!((a.total_score, a.current_score), (10, 0));

        channel.publish(&GameEvent::ResetGame);
        let state = store.snapshot();
        assert_eq!(state.participant("A").unwrap().total_score, 0);
        assert_eq!(state.mode, GameMode::Lobby);
        assert_eq!(state.current_game, None);
    }
}
