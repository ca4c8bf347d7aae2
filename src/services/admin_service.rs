use std::{fmt::Display, pin::pin};

use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::{
    dto::{
        game::ParticipantSummary,
        media::{MediaFile, UploadResponse},
        views::AdminView,
    },
    error::ServiceError,
    services::game_service::scoring_game,
    state::{SharedState, game::GameState, media::MediaKind},
};

/// Build the admin panel projection from the current snapshot.
pub fn view(state: &SharedState) -> AdminView {
    project(&state.snapshot())
}

/// Admin panel projection of `state`.
pub fn project(state: &GameState) -> AdminView {
    let scoring_game = scoring_game(state);
    AdminView {
        mode: state.mode,
        current_game: state.current_game,
        current_game_label: state.current_game.map(|game| game.label().to_string()),
        scoring_game,
        scoring_game_label: scoring_game.label().to_string(),
        participants: state
            .participants
            .values()
            .map(ParticipantSummary::from)
            .collect(),
        selected_media: state.selected_media.clone(),
    }
}

/// Stream an uploaded file to storage under the category named by `kind_tag`.
///
/// `kind_tag` has to be known before the file body starts. A failing chunk removes the
/// partial file.
pub async fn upload<S, B, E>(
    state: &SharedState,
    kind_tag: Option<&str>,
    file_name: Option<String>,
    chunks: S,
) -> Result<UploadResponse, ServiceError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let kind = parse_kind(kind_tag)?;
    let mut pending = state
        .media_store()
        .begin(kind, file_name.unwrap_or_default())
        .await
        .inspect_err(|err| warn!(error = %err, ?kind, "upload rejected"))?;

    let mut chunks = pin!(chunks);
    while let Some(chunk) = chunks.next().await {
        let written = match chunk {
            Ok(chunk) => pending.write(chunk.as_ref()).await.map_err(ServiceError::from),
            Err(err) => Err(ServiceError::InvalidInput(format!(
                "upload interrupted: {err}"
            ))),
        };
        if let Err(err) = written {
            warn!(error = %err, ?kind, "upload failed");
            pending.discard().await;
            return Err(err);
        }
    }

    let stored = pending.finish().await?;
    info!(?kind, url = %stored.url, "media uploaded");
    Ok(stored.into())
}

/// Error for a form that carried no file part.
pub fn missing_file(kind_tag: Option<&str>) -> ServiceError {
    match parse_kind(kind_tag) {
        Ok(_) => ServiceError::InvalidInput("no file uploaded".into()),
        Err(err) => err,
    }
}

fn parse_kind(kind_tag: Option<&str>) -> Result<MediaKind, ServiceError> {
    match kind_tag {
        Some(tag) => MediaKind::from_tag(tag)
            .ok_or_else(|| ServiceError::InvalidInput(format!("unknown media type `{tag}`"))),
        None => Err(ServiceError::InvalidInput(
            "missing media type; send `type` before `file`".into(),
        )),
    }
}

/// Every stored file of the category named by `kind_tag`; unknown categories list nothing.
pub async fn list_files(state: &SharedState, kind_tag: &str) -> Vec<MediaFile> {
    let Some(kind) = MediaKind::from_tag(kind_tag) else {
        return Vec::new();
    };
    state
        .media_store()
        .list(kind)
        .await
        .into_iter()
        .map(MediaFile::from)
        .collect()
}
