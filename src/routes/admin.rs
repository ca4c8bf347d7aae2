use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        game::{
            AddParticipantRequest, GameStateSnapshot, ModeChangeRequest, ParticipantSummary,
            ScorePresetRequest, ScoreUpdateRequest, ScoreUpdateResponse,
        },
        media::SelectMediaRequest,
        views::AdminView,
    },
    error::AppError,
    services::{admin_service, game_service},
    state::SharedState,
};

/// Admin panel endpoints: scoring, participants, mode and media selection.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/view", get(get_view))
        .route("/admin/score", post(update_score))
        .route("/admin/score/preset", post(apply_preset))
        .route("/admin/participants", post(add_participant))
        .route("/admin/participants/{id}", delete(remove_participant))
        .route("/admin/mode", post(change_mode))
        .route("/admin/reset", post(reset_game))
        .route("/admin/finalize", post(finalize_game))
        .route("/admin/media", put(select_media).delete(clear_media))
}

/// Return what the admin panel renders.
#[utoipa::path(
    get,
    path = "/admin/view",
    tag = "admin",
    responses((status = 200, description = "Admin projection", body = AdminView))
)]
pub async fn get_view(State(state): State<SharedState>) -> Json<AdminView> {
    Json(admin_service::view(&state))
}

/// Award or remove points. Without `gameType` the points go to the scoring game.
#[utoipa::path(
    post,
    path = "/admin/score",
    tag = "admin",
    request_body = ScoreUpdateRequest,
    responses((status = 200, description = "Score update published", body = ScoreUpdateResponse))
)]
pub async fn update_score(
    State(state): State<SharedState>,
    Json(request): Json<ScoreUpdateRequest>,
) -> Json<ScoreUpdateResponse> {
    Json(game_service::update_score(&state, request).await)
}

/// Apply one of the quick-action presets.
#[utoipa::path(
    post,
    path = "/admin/score/preset",
    tag = "admin",
    request_body = ScorePresetRequest,
    responses((status = 200, description = "Score update published", body = ScoreUpdateResponse))
)]
pub async fn apply_preset(
    State(state): State<SharedState>,
    Json(request): Json<ScorePresetRequest>,
) -> Json<ScoreUpdateResponse> {
    Json(game_service::apply_preset(&state, request).await)
}

/// Register a participant.
#[utoipa::path(
    post,
    path = "/admin/participants",
    tag = "admin",
    request_body = AddParticipantRequest,
    responses(
        (status = 201, description = "Participant added", body = ParticipantSummary),
        (status = 400, description = "Blank or oversized name")
    )
)]
pub async fn add_participant(
    State(state): State<SharedState>,
    Valid(Json(request)): Valid<Json<AddParticipantRequest>>,
) -> Result<(StatusCode, Json<ParticipantSummary>), AppError> {
    let participant = game_service::add_participant(&state, request).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Remove a participant. Unknown ids are ignored.
#[utoipa::path(
    delete,
    path = "/admin/participants/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Identifier of the participant to remove")),
    responses((status = 204, description = "Participant removed"))
)]
pub async fn remove_participant(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> StatusCode {
    game_service::remove_participant(&state, id).await;
    StatusCode::NO_CONTENT
}

/// Switch the display mode from the admin panel.
#[utoipa::path(
    post,
    path = "/admin/mode",
    tag = "admin",
    request_body = ModeChangeRequest,
    responses((status = 200, description = "Mode changed", body = GameStateSnapshot))
)]
pub async fn change_mode(
    State(state): State<SharedState>,
    Json(request): Json<ModeChangeRequest>,
) -> Json<GameStateSnapshot> {
    Json(game_service::change_mode(&state, request).await)
}

/// Reset the game from the admin panel.
#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    responses((status = 200, description = "Game reset", body = GameStateSnapshot))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::reset_game(&state).await)
}

/// Finalize the round from the admin panel.
#[utoipa::path(
    post,
    path = "/admin/finalize",
    tag = "admin",
    responses(
        (status = 200, description = "Round finalized", body = GameStateSnapshot),
        (status = 409, description = "Round already finalized")
    )
)]
pub async fn finalize_game(
    State(state): State<SharedState>,
) -> Result<Json<GameStateSnapshot>, AppError> {
    Ok(Json(game_service::finalize_game(&state).await?))
}

/// Select the media shown by the operator display when the mode matches.
#[utoipa::path(
    put,
    path = "/admin/media",
    tag = "admin",
    request_body = SelectMediaRequest,
    responses((status = 200, description = "Media selected", body = GameStateSnapshot))
)]
pub async fn select_media(
    State(state): State<SharedState>,
    Json(request): Json<SelectMediaRequest>,
) -> Json<GameStateSnapshot> {
    Json(game_service::select_media(&state, request).await)
}

/// Clear the media selection.
#[utoipa::path(
    delete,
    path = "/admin/media",
    tag = "admin",
    responses((status = 200, description = "Media cleared", body = GameStateSnapshot))
)]
pub async fn clear_media(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::clear_media(&state).await)
}
