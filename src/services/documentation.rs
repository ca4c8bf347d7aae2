use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the party scoreboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::stream,
        crate::routes::public::get_state,
        crate::routes::public::get_notification,
        crate::routes::public::dismiss_notification,
        crate::routes::operator::get_view,
        crate::routes::operator::change_mode,
        crate::routes::operator::reset_game,
        crate::routes::operator::finalize_game,
        crate::routes::operator::toggle_fullscreen,
        crate::routes::admin::get_view,
        crate::routes::admin::update_score,
        crate::routes::admin::apply_preset,
        crate::routes::admin::add_participant,
        crate::routes::admin::remove_participant,
        crate::routes::admin::change_mode,
        crate::routes::admin::reset_game,
        crate::routes::admin::finalize_game,
        crate::routes::admin::select_media,
        crate::routes::admin::clear_media,
        crate::routes::media::upload,
        crate::routes::media::list_files,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::GameStateSnapshot,
            crate::dto::game::ParticipantSummary,
            crate::dto::game::ModeChangeRequest,
            crate::dto::game::ScoreUpdateRequest,
            crate::dto::game::ScorePreset,
            crate::dto::game::ScorePresetRequest,
            crate::dto::game::AddParticipantRequest,
            crate::dto::game::ScoreUpdateResponse,
            crate::dto::views::OperatorView,
            crate::dto::views::ScoreboardEntry,
            crate::dto::views::AdminView,
            crate::dto::notification::NotificationDto,
            crate::dto::notification::NotificationResponse,
            crate::dto::notification::DismissResponse,
            crate::dto::media::UploadForm,
            crate::dto::media::UploadResponse,
            crate::dto::media::MediaFile,
            crate::dto::media::SelectMediaRequest,
            crate::dto::sse::StateChangedEvent,
            crate::dto::sse::NotificationShownEvent,
            crate::dto::sse::NotificationDismissedEvent,
            crate::state::game::GameMode,
            crate::state::game::Minigame,
            crate::state::game::GameScores,
            crate::state::media::MediaKind,
            crate::state::media::SelectedMedia,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "public", description = "Game state shared by every console"),
        (name = "operator", description = "Operator display projection and controls"),
        (name = "admin", description = "Scoring, participants and media selection"),
        (name = "media", description = "Media upload and listing"),
    )
)]
pub struct ApiDoc;
