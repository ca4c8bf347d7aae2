//! Named-topic publish/subscribe used to drive every game state mutation.
//!
//! Consoles never touch the store directly: they publish [`GameEvent`]s on an
//! [`EventChannel`], and the store, the notification overlay and anything else interested
//! subscribes to the topics it cares about. [`LocalChannel`] delivers in-process; a
//! network-backed channel only has to implement the same trait.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use serde::Serialize;

use crate::state::{
    game::{GameMode, Minigame, ScoreUpdate},
    media::SelectedMedia,
};

/// Name of a message stream on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// Points credited to a participant.
    ScoreUpdate,
    /// Display mode switch.
    ModeChange,
    /// Hard tournament reset.
    ResetGame,
    /// Round totals folded into tournament totals.
    FinalizeGame,
    /// New participant joins.
    AddParticipant,
    /// Participant leaves.
    RemoveParticipant,
    /// Admin picked (or cleared) media.
    MediaChange,
    /// Operator display fullscreen toggled.
    ToggleFullscreen,
}

impl Topic {
    /// Every topic, in declaration order.
    pub const ALL: [Topic; 8] = [
        Topic::ScoreUpdate,
        Topic::ModeChange,
        Topic::ResetGame,
        Topic::FinalizeGame,
        Topic::AddParticipant,
        Topic::RemoveParticipant,
        Topic::MediaChange,
        Topic::ToggleFullscreen,
    ];
}

/// Messages carried by the channel. Each variant belongs to exactly one [`Topic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Credit points to a participant.
    ScoreUpdate(ScoreUpdate),
    /// Switch display mode, optionally naming the minigame being scored.
    ModeChange {
        /// Target mode.
        mode: GameMode,
        /// Minigame to attribute points to.
        game: Option<Minigame>,
    },
    /// Back to the lobby with every score zeroed.
    ResetGame,
    /// Fold round scores into totals.
    FinalizeGame,
    /// Append a participant. The id is allocated by the publisher.
    AddParticipant {
        /// Fresh unique identifier.
        id: String,
        /// Display name, already trimmed and non-blank.
        name: String,
    },
    /// Remove a participant by id.
    RemoveParticipant {
        /// Identifier of the participant to drop.
        id: String,
    },
    /// Replace the selected media; `None` clears it.
    MediaChange(Option<SelectedMedia>),
    /// Flip the operator fullscreen flag.
    ToggleFullscreen,
}

impl GameEvent {
    /// Topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::ScoreUpdate(_) => Topic::ScoreUpdate,
            GameEvent::ModeChange { .. } => Topic::ModeChange,
            GameEvent::ResetGame => Topic::ResetGame,
            GameEvent::FinalizeGame => Topic::FinalizeGame,
            GameEvent::AddParticipant { .. } => Topic::AddParticipant,
            GameEvent::RemoveParticipant { .. } => Topic::RemoveParticipant,
            GameEvent::MediaChange(_) => Topic::MediaChange,
            GameEvent::ToggleFullscreen => Topic::ToggleFullscreen,
        }
    }
}

/// Callback invoked synchronously for every event on a subscribed topic.
pub type Handler = Arc<dyn Fn(&GameEvent) + Send + Sync>;

/// Identifier of a single registration on a channel.
pub type SubscriptionId = u64;

/// Receipt returned by [`EventChannel::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    /// Topic the handler was registered on.
    pub topic: Topic,
    /// Unique registration identifier.
    pub id: SubscriptionId,
}

/// Message-passing seam between the consoles and the state they observe.
pub trait EventChannel: Send + Sync {
    /// Register `handler` at the end of `topic`'s subscriber list.
    fn subscribe(&self, topic: Topic, handler: Handler) -> Subscription;

    /// Deliver `event` to every handler subscribed to its topic, in registration order.
    ///
    /// Returns the number of handlers invoked; zero subscribers is not an error.
    fn publish(&self, event: &GameEvent) -> usize;

    /// Remove one registration. Returns `false` when it was not (or no longer) registered.
    fn unsubscribe(&self, subscription: Subscription) -> bool;
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Same-process channel with synchronous, single-pass fan-out.
#[derive(Default)]
pub struct LocalChannel {
    topics: DashMap<Topic, Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl LocalChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers currently registered on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topics.get(&topic).map_or(0, |entry| entry.len())
    }
}

impl EventChannel for LocalChannel {
    fn subscribe(&self, topic: Topic, handler: Handler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.topics
            .entry(topic)
            .or_default()
            .push(Subscriber { id, handler });
        Subscription { topic, id }
    }

    fn publish(&self, event: &GameEvent) -> usize {
        // Capture the list and release the shard lock before calling out, so handlers can
        // (un)subscribe without deadlocking.
        let subscribers = match self.topics.get(&event.topic()) {
            Some(entry) => entry.value().clone(),
            None => return 0,
        };

        for subscriber in &subscribers {
            (subscriber.handler)(event);
        }
        subscribers.len()
    }

    fn unsubscribe(&self, subscription: Subscription) -> bool {
        let Some(mut entry) = self.topics.get_mut(&subscription.topic) else {
            return false;
        };

        let before = entry.len();
        entry.retain(|subscriber| subscriber.id != subscription.id);
        before != entry.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> Handler {
        let log = Arc::clone(log);
        Arc::new(move |event: &GameEvent| {
            log.lock()
                .unwrap()
                .push(format!("{label}:{:?}", event.topic()));
        })
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let channel = LocalChannel::new();
        assert_eq!(channel.publish(&GameEvent::ResetGame), 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let channel = LocalChannel::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        channel.subscribe(Topic::ResetGame, recorder(&log, "first"));
        channel.subscribe(Topic::ResetGame, recorder(&log, "second"));
        channel.subscribe(Topic::FinalizeGame, recorder(&log, "other"));

        assert_eq!(channel.publish(&GameEvent::ResetGame), 2);
        assert_eq!(
            *log.lock().unwrap(),
            ["first:ResetGame", "second:ResetGame"]
        );
    }

    #[test]
    fn payload_is_passed_unchanged() {
        let channel = LocalChannel::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        channel.subscribe(
            Topic::RemoveParticipant,
            Arc::new(move |event: &GameEvent| {
                *sink.lock().unwrap() = Some(event.clone());
            }),
        );

        let event = GameEvent::RemoveParticipant { id: "42".into() };
        channel.publish(&event);
        assert_eq!(seen.lock().unwrap().as_ref(), Some(&event));
    }

    #[test]
    fn unsubscribe_removes_only_that_handler() {
        let channel = LocalChannel::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = channel.subscribe(Topic::FinalizeGame, recorder(&log, "first"));
        channel.subscribe(Topic::FinalizeGame, recorder(&log, "second"));

        assert!(channel.unsubscribe(first));
        assert!(!channel.unsubscribe(first));
        assert_eq!(channel.subscriber_count(Topic::FinalizeGame), 1);

        channel.publish(&GameEvent::FinalizeGame);
        assert_eq!(*log.lock().unwrap(), ["second:FinalizeGame"]);
    }

    #[test]
    fn handler_may_unsubscribe_itself_during_publish() {
        let channel = Arc::new(LocalChannel::new());
        let calls = Arc::new(AtomicU64::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let handler: Handler = {
            let channel = Arc::clone(&channel);
            let calls = Arc::clone(&calls);
            let slot = Arc::clone(&slot);
            Arc::new(move |_: &GameEvent| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(subscription) = slot.lock().unwrap().take() {
                    channel.unsubscribe(subscription);
                }
            })
        };
        *slot.lock().unwrap() = Some(channel.subscribe(Topic::ToggleFullscreen, handler));

        channel.publish(&GameEvent::ToggleFullscreen);
        channel.publish(&GameEvent::ToggleFullscreen);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_subscribed_during_publish_waits_for_next_publish() {
        let channel = Arc::new(LocalChannel::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let registered = Arc::new(AtomicU64::new(0));

        let handler: Handler = {
            let channel = Arc::clone(&channel);
            let log = Arc::clone(&log);
            let registered = Arc::clone(&registered);
            Arc::new(move |event: &GameEvent| {
                log.lock()
                    .unwrap()
                    .push(format!("outer:{:?}", event.topic()));
                if registered.fetch_add(1, Ordering::SeqCst) == 0 {
                    channel.subscribe(Topic::ResetGame, recorder(&log, "late"));
                }
            })
        };
        channel.subscribe(Topic::ResetGame, handler);

        assert_eq!(channel.publish(&GameEvent::ResetGame), 1);
        assert_eq!(*log.lock().unwrap(), ["outer:ResetGame"]);
        assert_eq!(channel.subscriber_count(Topic::ResetGame), 2);

        assert_eq!(channel.publish(&GameEvent::ResetGame), 2);
        assert_eq!(
            *log.lock().unwrap(),
            ["outer:ResetGame", "outer:ResetGame", "late:ResetGame"]
        );
    }

    #[test]
    fn every_event_maps_to_its_topic() {
        let events = [
            GameEvent::ScoreUpdate(ScoreUpdate {
                participant_id: "1".into(),
                points: 1,
                reason: String::new(),
                game_type: Minigame::Karaoke,
            }),
            GameEvent::ModeChange {
                mode: GameMode::Lobby,
                game: None,
            },
            GameEvent::ResetGame,
            GameEvent::FinalizeGame,
            GameEvent::AddParticipant {
                id: "1".into(),
                name: "A".into(),
            },
            GameEvent::RemoveParticipant { id: "1".into() },
            GameEvent::MediaChange(None),
            GameEvent::ToggleFullscreen,
        ];
        let topics: Vec<_> = events.iter().map(GameEvent::topic).collect();
        assert_eq!(topics, Topic::ALL);
    }
}
