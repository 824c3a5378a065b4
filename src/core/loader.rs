//! Asset loader: discovery with guaranteed fallback.
//!
//! Bridges an [`AssetSource`] (the HTTP API or the scanner directly) to the
//! gallery and the music player. Whatever the source does, the result is
//! never empty: transport errors, `success: false` and empty lists all fall
//! back to six placeholder photos, and any music failure falls back to one
//! fixed track.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use super::photo::{
    DEFAULT_FALLBACK_TRACK, DEFAULT_PLACEHOLDER_TEMPLATE, MusicListing, Photo, PhotoListing,
    placeholder_photos,
};
use crate::scanner::AssetScanner;

/// Track a page may ship next to itself, tried when discovery finds nothing
pub const DEFAULT_TRACK_PATH: &str = "/music.mp3";

/// Where photo and music descriptors come from
pub trait AssetSource {
    fn fetch_photos(&self) -> Result<PhotoListing>;
    /// A playable music location, or `None` when nothing is available
    fn resolve_music(&self) -> Result<Option<String>>;
}

/// Scanner used in-process (no transport)
impl AssetSource for AssetScanner {
    fn fetch_photos(&self) -> Result<PhotoListing> {
        Ok(self.list_photos())
    }

    fn resolve_music(&self) -> Result<Option<String>> {
        Ok(self.list_music().music)
    }
}

/// Media server reached over HTTP
pub struct HttpAssetSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpAssetSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a server-relative path into a full URL
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            path.to_string()
        }
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .get(&url)
            .send()
            .with_context(|| format!("GET {} failed", url))
    }

    fn music_listing(&self) -> Result<MusicListing> {
        self.get("/api/music")?
            .json()
            .context("Invalid music listing")
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch_photos(&self) -> Result<PhotoListing> {
        let mut listing: PhotoListing = self
            .get("/api/photos")?
            .error_for_status()
            .context("Photo listing returned an error status")?
            .json()
            .context("Invalid photo listing")?;
        for photo in &mut listing.photos {
            photo.url = self.absolute(&photo.url);
        }
        Ok(listing)
    }

    fn resolve_music(&self) -> Result<Option<String>> {
        match self.music_listing() {
            Ok(MusicListing { success: true, music: Some(path), .. }) => {
                return Ok(Some(self.absolute(&path)));
            }
            Ok(listing) => debug!("Music listing empty: {:?}", listing.message),
            Err(e) => warn!("Music listing unavailable: {:#}", e),
        }

        // Conventional default track next to the page
        let probe = self.get(DEFAULT_TRACK_PATH)?;
        if probe.status().is_success() && is_audio(&probe) {
            return Ok(Some(self.absolute(DEFAULT_TRACK_PATH)));
        }
        debug!("No audio at {} (status {})", DEFAULT_TRACK_PATH, probe.status());
        Ok(None)
    }
}

/// Servers answer unknown paths with an HTML page; only real audio counts.
fn is_audio(response: &reqwest::blocking::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("audio/"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOrigin {
    Discovered,
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct LoadedPhotos {
    pub photos: Vec<Photo>,
    pub origin: PhotoOrigin,
}

impl LoadedPhotos {
    pub fn count_label(&self) -> String {
        match self.origin {
            PhotoOrigin::Discovered => self.photos.len().to_string(),
            PhotoOrigin::Placeholder => format!("{} (using placeholders)", self.photos.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicOrigin {
    Discovered,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ResolvedMusic {
    pub source: String,
    pub origin: MusicOrigin,
}

impl ResolvedMusic {
    pub fn count_label(&self) -> &'static str {
        match self.origin {
            MusicOrigin::Discovered => "1",
            MusicOrigin::Fallback => "1 (using default)",
        }
    }

    pub fn status_message(&self) -> &'static str {
        match self.origin {
            MusicOrigin::Discovered => "Music loaded successfully!",
            MusicOrigin::Fallback => "Using default birthday music",
        }
    }
}

/// Fallback policy for discovery
#[derive(Debug, Clone)]
pub struct AssetLoader {
    placeholder_template: String,
    fallback_track: String,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_TEMPLATE, DEFAULT_FALLBACK_TRACK)
    }
}

impl AssetLoader {
    pub fn new(placeholder_template: &str, fallback_track: &str) -> Self {
        Self {
            placeholder_template: placeholder_template.to_string(),
            fallback_track: fallback_track.to_string(),
        }
    }

    /// Discovered photos verbatim, or placeholders on any failure or emptiness.
    pub fn load_photos(&self, source: &dyn AssetSource) -> LoadedPhotos {
        match source.fetch_photos() {
            Ok(listing) if listing.success && !listing.photos.is_empty() => {
                info!("Loaded {} photo(s)", listing.photos.len());
                LoadedPhotos {
                    photos: listing.photos,
                    origin: PhotoOrigin::Discovered,
                }
            }
            Ok(listing) => {
                info!(
                    "No photos available (success: {}), using placeholders",
                    listing.success
                );
                self.placeholders()
            }
            Err(e) => {
                warn!("Error loading photos: {:#}", e);
                self.placeholders()
            }
        }
    }

    /// Exactly one playable source: discovered, or the fallback track.
    pub fn load_music(&self, source: &dyn AssetSource) -> ResolvedMusic {
        match source.resolve_music() {
            Ok(Some(url)) => {
                info!("Music resolved: {}", url);
                ResolvedMusic {
                    source: url,
                    origin: MusicOrigin::Discovered,
                }
            }
            Ok(None) => {
                info!("No music available, using default track");
                self.fallback_music()
            }
            Err(e) => {
                warn!("Error loading music: {:#}", e);
                self.fallback_music()
            }
        }
    }

    fn placeholders(&self) -> LoadedPhotos {
        LoadedPhotos {
            photos: placeholder_photos(&self.placeholder_template),
            origin: PhotoOrigin::Placeholder,
        }
    }

    fn fallback_music(&self) -> ResolvedMusic {
        ResolvedMusic {
            source: self.fallback_track.clone(),
            origin: MusicOrigin::Fallback,
        }
    }
}
