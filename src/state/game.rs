use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::media::SelectedMedia;

/// Display/activity state of the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    /// Waiting room shown between games.
    Lobby,
    /// Karaoke minigame.
    Karaoke,
    /// Guess-the-lyrics minigame.
    GuessLyrics,
    /// Guess-the-picture minigame.
    GuessImage,
    /// Scores of the round that was just played.
    Scores,
    /// Tournament totals.
    FinalScores,
    /// Closing screen.
    Ended,
}

impl GameMode {
    /// Minigame displayed by this mode, if any.
    pub fn minigame(self) -> Option<Minigame> {
        match self {
            GameMode::Karaoke => Some(Minigame::Karaoke),
            GameMode::GuessLyrics => Some(Minigame::GuessLyrics),
            GameMode::GuessImage => Some(Minigame::GuessImage),
            GameMode::Lobby
            | GameMode::Scores
            | GameMode::FinalScores
            | GameMode::Ended => None,
        }
    }

    /// Whether this mode is one of the three scoring activities.
    pub fn is_minigame(self) -> bool {
        self.minigame().is_some()
    }
}

/// The three scoring activities points can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Minigame {
    /// Karaoke.
    Karaoke,
    /// Guess the lyrics.
    GuessLyrics,
    /// Guess the picture.
    GuessImage,
}

impl Minigame {
    /// Human readable name shown on the consoles.
    pub fn label(self) -> &'static str {
        match self {
            Minigame::Karaoke => "Karaoke",
            Minigame::GuessLyrics => "Guess the Lyrics",
            Minigame::GuessImage => "Guess the Picture",
        }
    }
}

/// Per-minigame running totals. Never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameScores {
    /// Points earned in karaoke rounds.
    pub karaoke: i64,
    /// Points earned in guess-the-lyrics rounds.
    pub guess_lyrics: i64,
    /// Points earned in guess-the-picture rounds.
    pub guess_image: i64,
}

impl GameScores {
    /// Accumulated points for one minigame.
    pub fn get(&self, game: Minigame) -> i64 {
        match game {
            Minigame::Karaoke => self.karaoke,
            Minigame::GuessLyrics => self.guess_lyrics,
            Minigame::GuessImage => self.guess_image,
        }
    }

    fn add(&mut self, game: Minigame, points: i64) {
        let slot = match game {
            Minigame::Karaoke => &mut self.karaoke,
            Minigame::GuessLyrics => &mut self.guess_lyrics,
            Minigame::GuessImage => &mut self.guess_image,
        };
        *slot = slot.saturating_add(points);
    }
}

/// Player or team tracked on the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Opaque identifier, stable for the participant's lifetime.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Score of the round in progress.
    pub current_score: i64,
    /// Tournament total, accumulated on finalize.
    pub total_score: i64,
    /// Per-minigame accumulated scores.
    pub game_scores: GameScores,
}

impl Participant {
    /// Fresh participant with zeroed scores.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_score: 0,
            total_score: 0,
            game_scores: GameScores::default(),
        }
    }
}

/// Points awarded (or removed) for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Participant receiving the points.
    pub participant_id: String,
    /// Signed amount of points.
    pub points: i64,
    /// Free-text reason displayed in the notification.
    pub reason: String,
    /// Minigame the points are attributed to.
    pub game_type: Minigame,
}

/// Authoritative snapshot of a game session.
///
/// Snapshots are never mutated once published: every reducer below builds a new value from the
/// previous one, and returns `None` when the event leaves the snapshot untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Current display mode.
    pub mode: GameMode,
    /// Minigame points are attributed to. Sticky across non-minigame modes.
    pub current_game: Option<Minigame>,
    /// Participants keyed by id, in insertion order.
    pub participants: IndexMap<String, Participant>,
    /// True while a minigame mode is displayed.
    pub is_active: bool,
    /// Operator display fullscreen flag.
    pub is_fullscreen: bool,
    /// Media picked by the admin, last write wins.
    pub selected_media: Option<SelectedMedia>,
    /// Whether the running round has already been folded into totals.
    pub round_finalized: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            mode: GameMode::Lobby,
            current_game: None,
            participants: IndexMap::new(),
            is_active: false,
            is_fullscreen: false,
            selected_media: None,
            round_finalized: false,
        }
    }
}

impl GameState {
    /// Build a lobby snapshot seeded with the given participants.
    pub fn with_participants(participants: impl IntoIterator<Item = Participant>) -> Self {
        Self {
            participants: participants
                .into_iter()
                .map(|participant| (participant.id.clone(), participant))
                .collect(),
            ..Self::default()
        }
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Credit points to one participant for the round and for the given minigame.
    ///
    /// Scores saturate at the `i64` bounds.
    pub fn score_update(&self, update: &ScoreUpdate) -> Option<Self> {
        if !self.participants.contains_key(&update.participant_id) {
            return None;
        }

        let mut next = self.clone();
        if let Some(participant) = next.participants.get_mut(&update.participant_id) {
            participant.current_score = participant.current_score.saturating_add(update.points);
            participant.game_scores.add(update.game_type, update.points);
        }
        next.round_finalized = false;
        Some(next)
    }

    /// Switch display mode, starting a fresh round when entering a different minigame.
    pub fn mode_change(&self, mode: GameMode, game: Option<Minigame>) -> Self {
        let current_game = game.or(mode.minigame()).or(self.current_game);
        let new_round =
            mode.is_minigame() && (mode != self.mode || current_game != self.current_game);

        let mut next = self.clone();
        next.mode = mode;
        next.current_game = current_game;
        next.is_active = mode.is_minigame();
        if new_round {
            for participant in next.participants.values_mut() {
                participant.current_score = 0;
            }
            next.round_finalized = false;
        }
        next
    }

    /// Hard tournament reset: back to the lobby with round and total scores zeroed.
    pub fn reset_game(&self) -> Self {
        let mut next = self.clone();
        next.mode = GameMode::Lobby;
        next.current_game = None;
        next.is_active = false;
        next.round_finalized = false;
        for participant in next.participants.values_mut() {
            participant.current_score = 0;
            participant.total_score = 0;
        }
        next
    }

    /// Fold every participant's round score into their total.
    pub fn finalize_game(&self) -> Self {
        let mut next = self.clone();
        for participant in next.participants.values_mut() {
            participant.total_score = participant
                .total_score
                .saturating_add(participant.current_score);
            participant.current_score = 0;
        }
        next.round_finalized = true;
        next
    }

    /// Append a participant with zeroed scores.
    pub fn add_participant(&self, id: &str, name: &str) -> Option<Self> {
        if self.participants.contains_key(id) {
            return None;
        }

        let mut next = self.clone();
        next.participants
            .insert(id.to_string(), Participant::new(id, name));
        Some(next)
    }

    /// Remove a participant, keeping the order of the others.
    pub fn remove_participant(&self, id: &str) -> Option<Self> {
        if !self.participants.contains_key(id) {
            return None;
        }

        let mut next = self.clone();
        next.participants.shift_remove(id);
        Some(next)
    }

    /// Replace the selected media wholesale.
    pub fn media_change(&self, media: Option<SelectedMedia>) -> Self {
        Self {
            selected_media: media,
            ..self.clone()
        }
    }

    /// Flip the operator fullscreen flag.
    pub fn toggle_fullscreen(&self) -> Self {
        Self {
            is_fullscreen: !self.is_fullscreen,
            ..self.clone()
        }
    }
}
