/// Admin panel projection and media upload/listing.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game controls shared by the operator and admin consoles.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Operator display projection.
pub mod operator_service;
/// Read-only game state and score popup.
pub mod public_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
