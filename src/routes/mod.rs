use axum::Router;

use crate::state::SharedState;

pub mod admin;
pub mod docs;
pub mod health;
pub mod media;
pub mod operator;
pub mod public;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let config = state.config();
    let api_router = health::router()
        .merge(sse::router())
        .merge(public::router())
        .merge(operator::router())
        .merge(admin::router())
        .merge(media::router(config.assets_dir()));

    api_router.merge(docs::router()).with_state(state)
}
