use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dao::media_store::StoredMedia,
    state::media::{MediaKind, SelectedMedia},
};

/// Multipart body accepted by `POST /upload`. Documentation only.
#[derive(ToSchema)]
pub struct UploadForm {
    /// File contents.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// `music`, `video` or `image`.
    pub r#type: String,
}

/// Where an uploaded file can be fetched from.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    /// Uploaded file name, without client-side directories.
    pub name: String,
}

impl From<StoredMedia> for UploadResponse {
    fn from(stored: StoredMedia) -> Self {
        Self {
            url: stored.url,
            name: stored.name,
        }
    }
}

/// Entry of a category listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct MediaFile {
    pub name: String,
    pub url: String,
}

impl From<StoredMedia> for MediaFile {
    fn from(stored: StoredMedia) -> Self {
        Self {
            name: stored.name,
            url: stored.url,
        }
    }
}

/// Media the admin wants the operator display to show.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectMediaRequest {
    pub kind: MediaKind,
    pub url: String,
}

impl From<SelectMediaRequest> for SelectedMedia {
    fn from(request: SelectMediaRequest) -> Self {
        SelectedMedia::new(request.kind, request.url)
    }
}
