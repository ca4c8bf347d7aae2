use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_participant_name,
    state::{
        game::{GameMode, GameScores, GameState, Minigame, Participant},
        media::SelectedMedia,
    },
};

/// Public projection of a participant exposed to REST/SSE clients.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub id: String,
    pub name: String,
    pub current_score: i64,
    pub total_score: i64,
    pub game_scores: GameScores,
}

impl From<&Participant> for ParticipantSummary {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            current_score: participant.current_score,
            total_score: participant.total_score,
            game_scores: participant.game_scores,
        }
    }
}

/// Full game snapshot as stored by the backend.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    pub mode: GameMode,
    pub current_game: Option<Minigame>,
    /// Participants in insertion order.
    pub participants: Vec<ParticipantSummary>,
    pub is_active: bool,
    pub is_fullscreen: bool,
    pub selected_media: Option<SelectedMedia>,
}

impl From<&GameState> for GameStateSnapshot {
    fn from(state: &GameState) -> Self {
        Self {
            mode: state.mode,
            current_game: state.current_game,
            participants: state
                .participants
                .values()
                .map(ParticipantSummary::from)
                .collect(),
            is_active: state.is_active,
            is_fullscreen: state.is_fullscreen,
            selected_media: state.selected_media.clone(),
        }
    }
}

/// Switch the display mode, optionally naming the minigame points go to.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModeChangeRequest {
    pub mode: GameMode,
    /// Defaults to the mode's own minigame, or leaves the current game untouched.
    #[serde(default)]
    pub game: Option<Minigame>,
}

/// Award or remove points for one participant.
#[serde_as]
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateRequest {
    pub participant_id: String,
    /// Signed integer; numeric strings are accepted and anything unparsable counts as 0.
    #[serde_as(as = "DefaultOnError<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    #[schema(value_type = i64)]
    pub points: i64,
    #[serde(default)]
    pub reason: String,
    /// Defaults to the admin's scoring game.
    #[serde(default)]
    pub game_type: Option<Minigame>,
}

/// Quick scoring actions offered by the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ScorePreset {
    /// +10, "Correct Answer".
    Correct,
    /// +5, "Bonus".
    Bonus,
    /// -5, "Penalty".
    Penalty,
}

impl ScorePreset {
    /// Points awarded by this preset.
    pub fn points(self) -> i64 {
        match self {
            ScorePreset::Correct => 10,
            ScorePreset::Bonus => 5,
            ScorePreset::Penalty => -5,
        }
    }

    /// Reason attached to the score update.
    pub fn reason(self) -> &'static str {
        match self {
            ScorePreset::Correct => "Correct Answer",
            ScorePreset::Bonus => "Bonus",
            ScorePreset::Penalty => "Penalty",
        }
    }
}

/// Apply a [`ScorePreset`] to one participant.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScorePresetRequest {
    pub participant_id: String,
    pub preset: ScorePreset,
    #[serde(default)]
    pub game_type: Option<Minigame>,
}

/// Register a new participant.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddParticipantRequest {
    #[validate(custom(function = "validate_participant_name"))]
    pub name: String,
}

/// Result of a score update: the participant after the change, when it exists.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateResponse {
    pub applied: bool,
    pub participant: Option<ParticipantSummary>,
}
