use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        game::GameStateSnapshot,
        notification::{DismissResponse, NotificationResponse},
    },
    services::public_service,
    state::SharedState,
};

/// Read-only endpoints shared by every console.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/notification", get(get_notification))
        .route("/notification/dismiss", post(dismiss_notification))
}

#[utoipa::path(
    get,
    path = "/state",
    tag = "public",
    responses((status = 200, description = "Current game snapshot", body = GameStateSnapshot))
)]
/// Return the full game snapshot.
pub async fn get_state(State(state): State<SharedState>) -> Json<GameStateSnapshot> {
    Json(public_service::get_state(&state))
}

#[utoipa::path(
    get,
    path = "/notification",
    tag = "public",
    responses((status = 200, description = "Score popup currently on screen", body = NotificationResponse))
)]
/// Return the score popup currently on screen, if any.
pub async fn get_notification(State(state): State<SharedState>) -> Json<NotificationResponse> {
    Json(public_service::get_notification(&state))
}

#[utoipa::path(
    post,
    path = "/notification/dismiss",
    tag = "public",
    responses((status = 200, description = "Popup hidden", body = DismissResponse))
)]
/// Hide the score popup before it expires.
pub async fn dismiss_notification(State(state): State<SharedState>) -> Json<DismissResponse> {
    Json(public_service::dismiss_notification(&state))
}
