use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::game::GameMode;

/// Category of an uploaded media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Audio tracks played during guess-the-lyrics.
    Music,
    /// Karaoke videos.
    Video,
    /// Pictures shown during guess-the-picture.
    Image,
}

impl MediaKind {
    /// Every category, in folder creation order.
    pub const ALL: [MediaKind; 3] = [MediaKind::Music, MediaKind::Video, MediaKind::Image];

    /// Parse the category tag used by upload forms and listing paths.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "music" => Some(MediaKind::Music),
            "video" => Some(MediaKind::Video),
            "image" => Some(MediaKind::Image),
            _ => None,
        }
    }

    /// Directory (below the assets root) holding files of this category.
    pub fn folder(self) -> &'static str {
        match self {
            MediaKind::Music => "music",
            MediaKind::Video => "video",
            MediaKind::Image => "images",
        }
    }

    /// Display mode in which media of this category is rendered.
    pub fn display_mode(self) -> GameMode {
        match self {
            MediaKind::Music => GameMode::GuessLyrics,
            MediaKind::Video => GameMode::Karaoke,
            MediaKind::Image => GameMode::GuessImage,
        }
    }
}

/// Media currently picked by the admin for the operator display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectedMedia {
    /// Category of the file.
    pub kind: MediaKind,
    /// URL the operator display loads the file from.
    pub url: String,
}

impl SelectedMedia {
    /// Pair a category with a URL.
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }

    /// Whether the operator renders this selection while displaying `mode`.
    pub fn renders_in(&self, mode: GameMode) -> bool {
        self.kind.display_mode() == mode
    }
}

/// Return the selection to render for `mode`, hiding media meant for another minigame.
pub fn rendered_media(mode: GameMode, selected: Option<&SelectedMedia>) -> Option<&SelectedMedia> {
    selected.filter(|media| media.renders_in(mode))
}
