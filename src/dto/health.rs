use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether the assets directory is reachable.
    pub assets: bool,
}

impl HealthResponse {
    /// Everything reachable.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            assets: true,
        }
    }

    /// Game state is served but uploads and listings will fail.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            assets: false,
        }
    }
}
