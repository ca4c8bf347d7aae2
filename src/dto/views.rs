use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::game::ParticipantSummary,
    state::{
        game::{GameMode, Minigame},
        media::SelectedMedia,
    },
};

/// One row of the operator scoreboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub current_score: i64,
    pub total_score: i64,
}

/// Everything the operator display renders.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorView {
    pub mode: GameMode,
    pub current_game: Option<Minigame>,
    pub title: String,
    pub subtitle: String,
    /// Ranked by round score on the scores screen, by total on the final screen.
    pub scoreboard: Vec<ScoreboardEntry>,
    /// Selected media, only when it belongs to the displayed minigame.
    pub media: Option<SelectedMedia>,
    pub is_fullscreen: bool,
}

/// Everything the admin panel renders.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    pub mode: GameMode,
    pub current_game: Option<Minigame>,
    pub current_game_label: Option<String>,
    /// Minigame a score update without `gameType` is attributed to.
    pub scoring_game: Minigame,
    pub scoring_game_label: String,
    pub participants: Vec<ParticipantSummary>,
    /// Stored selection, whatever the mode.
    pub selected_media: Option<SelectedMedia>,
}
