use std::path::Path as FsPath;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    dao::media_store::ASSETS_MOUNT,
    dto::media::{MediaFile, UploadForm, UploadResponse},
    error::AppError,
    services::admin_service,
    state::SharedState,
};

/// Largest accepted upload body.
const UPLOAD_LIMIT_BYTES: usize = 512 * 1024 * 1024;

/// Upload and listing endpoints, plus static serving of the asset tree.
pub fn router(assets_dir: &FsPath) -> Router<SharedState> {
    Router::new()
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/files/{kind}", get(list_files))
        .nest_service(ASSETS_MOUNT, ServeDir::new(assets_dir))
}

/// Store an uploaded file under its category folder.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "media",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file or unknown type")
    )
)]
pub async fn upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut kind = None;
    let mut uploaded = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("type") => {
                kind = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| AppError::BadRequest(err.body_text()))?,
                );
            }
            Some("file") if uploaded.is_none() => {
                let file_name = field.file_name().map(str::to_string);
                uploaded =
                    Some(admin_service::upload(&state, kind.as_deref(), file_name, field).await?);
            }
            _ => {}
        }
    }

    match uploaded {
        Some(response) => Ok(Json(response)),
        None => Err(admin_service::missing_file(kind.as_deref()).into()),
    }
}

/// List stored files of a category; unknown categories yield an empty list.
#[utoipa::path(
    get,
    path = "/files/{kind}",
    tag = "media",
    params(("kind" = String, Path, description = "`music`, `video` or `image`")),
    responses((status = 200, description = "Stored files sorted by name", body = [MediaFile]))
)]
pub async fn list_files(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
) -> Json<Vec<MediaFile>> {
    Json(admin_service::list_files(&state, &kind).await)
}
