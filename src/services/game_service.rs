use std::sync::Arc;

use tracing::info;

use crate::{
    config::FinalizePolicy,
    dto::{
        game::{
            AddParticipantRequest, GameStateSnapshot, ModeChangeRequest, ParticipantSummary,
            ScorePresetRequest, ScoreUpdateRequest, ScoreUpdateResponse,
        },
        media::SelectMediaRequest,
    },
    error::ServiceError,
    state::{
        SharedState,
        channel::GameEvent,
        game::{GameState, Minigame, ScoreUpdate},
    },
};

/// Minigame a score update without an explicit game is attributed to.
pub fn scoring_game(state: &GameState) -> Minigame {
    state.current_game.unwrap_or(Minigame::Karaoke)
}

/// Switch the display mode.
pub async fn change_mode(state: &SharedState, request: ModeChangeRequest) -> GameStateSnapshot {
    let ModeChangeRequest { mode, game } = request;
    let next = state.dispatch(GameEvent::ModeChange { mode, game }).await;
    info!(?mode, game = ?next.current_game, "mode changed");
    GameStateSnapshot::from(next.as_ref())
}

/// Back to the lobby with every round and total score cleared.
pub async fn reset_game(state: &SharedState) -> GameStateSnapshot {
    let next = state.dispatch(GameEvent::ResetGame).await;
    info!("game reset");
    GameStateSnapshot::from(next.as_ref())
}

/// Fold round scores into totals, honouring the configured repeat policy.
pub async fn finalize_game(state: &SharedState) -> Result<GameStateSnapshot, ServiceError> {
    let policy = state.config().finalize_policy();
    let next = state
        .dispatch_if(GameEvent::FinalizeGame, |current| match policy {
            FinalizePolicy::RejectRepeat if current.round_finalized => Err(
                ServiceError::InvalidState("round has already been finalized".into()),
            ),
            _ => Ok(()),
        })
        .await?;
    info!("round finalized");
    Ok(GameStateSnapshot::from(next.as_ref()))
}

/// Flip the operator display fullscreen flag.
pub async fn toggle_fullscreen(state: &SharedState) -> GameStateSnapshot {
    let next = state.dispatch(GameEvent::ToggleFullscreen).await;
    GameStateSnapshot::from(next.as_ref())
}

/// Award points to a participant. Unknown participants are left untouched but still raise
/// the score popup.
pub async fn update_score(state: &SharedState, request: ScoreUpdateRequest) -> ScoreUpdateResponse {
    let ScoreUpdateRequest {
        participant_id,
        points,
        reason,
        game_type,
    } = request;
    let game_type = game_type.unwrap_or_else(|| scoring_game(&state.snapshot()));
    apply_score(
        state,
        ScoreUpdate {
            participant_id,
            points,
            reason,
            game_type,
        },
    )
    .await
}

/// Award one of the console's quick-action presets.
pub async fn apply_preset(state: &SharedState, request: ScorePresetRequest) -> ScoreUpdateResponse {
    let ScorePresetRequest {
        participant_id,
        preset,
        game_type,
    } = request;
    let game_type = game_type.unwrap_or_else(|| scoring_game(&state.snapshot()));
    apply_score(
        state,
        ScoreUpdate {
            participant_id,
            points: preset.points(),
            reason: preset.reason().to_string(),
            game_type,
        },
    )
    .await
}

async fn apply_score(state: &SharedState, update: ScoreUpdate) -> ScoreUpdateResponse {
    let before = state.snapshot();
    let participant_id = update.participant_id.clone();
    let (points, game_type) = (update.points, update.game_type);

    let next = state.dispatch(GameEvent::ScoreUpdate(update)).await;
    let participant = next.participant(&participant_id).map(ParticipantSummary::from);
    let applied = participant.is_some() && !Arc::ptr_eq(&before, &next);
    info!(participant = %participant_id, points, ?game_type, applied, "score update");

    ScoreUpdateResponse {
        applied,
        participant,
    }
}

/// Register a new participant with a freshly allocated id.
pub async fn add_participant(
    state: &SharedState,
    request: AddParticipantRequest,
) -> Result<ParticipantSummary, ServiceError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "participant name must not be blank".into(),
        ));
    }

    let id = state.next_participant_id();
    let next = state
        .dispatch(GameEvent::AddParticipant {
            id: id.clone(),
            name,
        })
        .await;
    let participant = next.participant(&id).ok_or_else(|| {
        ServiceError::InvalidState(format!("participant `{id}` could not be added"))
    })?;
    info!(id = %participant.id, name = %participant.name, "participant added");
    Ok(ParticipantSummary::from(participant))
}

/// Remove a participant; unknown ids are ignored.
pub async fn remove_participant(state: &SharedState, id: String) {
    let before = state.snapshot();
    let next = state
        .dispatch(GameEvent::RemoveParticipant { id: id.clone() })
        .await;
    info!(id = %id, removed = !Arc::ptr_eq(&before, &next), "remove participant");
}

/// Pick the media the operator display should show.
pub async fn select_media(state: &SharedState, request: SelectMediaRequest) -> GameStateSnapshot {
    let next = state
        .dispatch(GameEvent::MediaChange(Some(request.into())))
        .await;
    GameStateSnapshot::from(next.as_ref())
}

/// Clear the media selection.
pub async fn clear_media(state: &SharedState) -> GameStateSnapshot {
    let next = state.dispatch(GameEvent::MediaChange(None)).await;
    GameStateSnapshot::from(next.as_ref())
}
