use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the media store is reachable; game state is always served from memory.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.media_store().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "media store health check failed");
            HealthResponse::degraded()
        }
    }
}
