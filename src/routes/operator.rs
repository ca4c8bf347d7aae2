use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        game::{GameStateSnapshot, ModeChangeRequest},
        views::OperatorView,
    },
    error::AppError,
    services::{game_service, operator_service},
    state::SharedState,
};

/// Operator display projection and its controls.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/operator/view", get(get_view))
        .route("/operator/mode", post(change_mode))
        .route("/operator/reset", post(reset_game))
        .route("/operator/finalize", post(finalize_game))
        .route("/operator/fullscreen", post(toggle_fullscreen))
}

/// Return what the operator display renders.
#[utoipa::path(
    get,
    path = "/operator/view",
    tag = "operator",
    responses((status = 200, description = "Operator projection", body = OperatorView))
)]
pub async fn get_view(State(state): State<SharedState>) -> Json<OperatorView> {
    Json(operator_service::view(&state))
}

/// Switch the display mode.
#[utoipa::path(
    post,
    path = "/operator/mode",
    tag = "operator",
    request_body = ModeChangeRequest,
    responses((status = 200, description = "Mode changed", body = GameStateSnapshot))
)]
pub async fn change_mode(
    State(state): State<SharedState>,
    Json(request): Json<ModeChangeRequest>,
) -> Json<GameStateSnapshot> {
    Json(game_service::change_mode(&state, request).await)
}

/// Return to the lobby and clear every score but the per-game history.
#[utoipa::path(
    post,
    path = "/operator/reset",
    tag = "operator",
    responses((status = 200, description = "Game reset", body = GameStateSnapshot))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::reset_game(&state).await)
}

/// Fold round scores into the tournament totals.
#[utoipa::path(
    post,
    path = "/operator/finalize",
    tag = "operator",
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

/// Flip the fullscreen flag of the operator display.
#[utoipa::path(
    post,
    path = "/operator/fullscreen",
    tag = "operator",
    responses((status = 200, description = "Fullscreen toggled", body = GameStateSnapshot))
)]
pub async fn toggle_fullscreen(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(game_service::toggle_fullscreen(&state).await)
}
