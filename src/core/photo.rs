//! Media descriptors shared by the server, loader and gallery.
//!
//! A [`Photo`] is the lightweight record that travels from the scanner,
//! over `/api/photos`, into [`GalleryState`](super::gallery::GalleryState).
//! Ids are positional: they are assigned when a list is produced and are not
//! stable across reloads or uploads.

use serde::{Deserialize, Serialize};

/// Number of generated placeholders used when no real photos are available
pub const PLACEHOLDER_COUNT: u32 = 6;

/// Default placeholder image template, `{id}` is replaced by the photo id
pub const DEFAULT_PLACEHOLDER_TEMPLATE: &str = "https://picsum.photos/800/500?random={id}";

/// Default track used when no music can be resolved
pub const DEFAULT_FALLBACK_TRACK: &str =
    "https://assets.mixkit.co/music/preview/mixkit-happy-birthday-to-you-443.mp3";

/// One displayable photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// 1-based position at load time
    pub id: u32,
    /// Network path (`/public/a.png`), absolute URL, or `data:` URL
    pub url: String,
    /// Display label
    pub title: String,
    /// Source file name (server-discovered photos only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Photo {
    pub fn new(id: u32, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: title.into(),
            filename: None,
        }
    }

    /// Label used for discovered and placeholder photos
    pub fn memory_title(id: u32) -> String {
        format!("Memory {}", id)
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Generate the fixed placeholder set (ids 1..=6), each keyed to a distinct image.
pub fn placeholder_photos(template: &str) -> Vec<Photo> {
    (1..=PLACEHOLDER_COUNT)
        .map(|id| {
            let url = template.replace("{id}", &id.to_string());
            Photo::new(id, url, Photo::memory_title(id))
        })
        .collect()
}

/// `/api/photos` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoListing {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl PhotoListing {
    pub fn found(photos: Vec<Photo>) -> Self {
        Self {
            success: true,
            count: Some(photos.len()),
            photos,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            count: None,
            photos: Vec::new(),
        }
    }
}

/// `/api/music` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicListing {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MusicListing {
    pub fn found(path: impl Into<String>) -> Self {
        Self {
            success: true,
            music: Some(path.into()),
            message: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            music: None,
            message: Some(message.to_string()),
        }
    }
}
