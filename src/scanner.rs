//! Media directory scanner
//!
//! Enumerates the immediate entries of the media directory and classifies
//! them by extension. Every call rescans; nothing is cached. Failures never
//! propagate: they become `success: false` listings so clients can fall back.

use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::core::photo::{MusicListing, Photo, PhotoListing};

/// Image extensions served by `/api/photos`
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Audio extensions served by `/api/music`
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];

/// URL prefix under which the media directory is published
pub const PUBLIC_PREFIX: &str = "/public";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
        }
    }

    /// Case-insensitive extension match on a file name
    pub fn matches(self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Scanner bound to one media directory
#[derive(Debug, Clone)]
pub struct AssetScanner {
    dir: PathBuf,
}

impl AssetScanner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of matching entries, in ascending name order.
    pub fn scan(&self, kind: MediaKind) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            // Non-UTF-8 names cannot be published as URLs
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!("Skipping non-UTF-8 entry {:?}", raw);
                    continue;
                }
            };
            if kind.matches(&name) {
                names.push(name);
            }
        }
        names.sort();
        debug!("Scanned {} for {:?}: {} match(es)", self.dir.display(), kind, names.len());
        Ok(names)
    }

    /// Photo descriptors for every image in the directory
    pub fn list_photos(&self) -> PhotoListing {
        match self.scan(MediaKind::Image) {
            Ok(names) => {
                let photos: Vec<Photo> = names
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let id = i as u32 + 1;
                        Photo::new(id, public_url(&name), Photo::memory_title(id)).with_filename(name)
                    })
                    .collect();
                if photos.is_empty() {
                    info!("No photos found in {}", self.dir.display());
                }
                PhotoListing::found(photos)
            }
            Err(e) => {
                error!("Error reading photos from {}: {}", self.dir.display(), e);
                PhotoListing::failed()
            }
        }
    }

    /// First audio file in the directory, if any
    pub fn list_music(&self) -> MusicListing {
        match self.scan(MediaKind::Audio) {
            Ok(names) => match names.first() {
                Some(name) => MusicListing::found(public_url(name)),
                None => {
                    info!("No music found in {}", self.dir.display());
                    MusicListing::failed("No music file found")
                }
            },
            Err(e) => {
                error!("Error reading music from {}: {}", self.dir.display(), e);
                MusicListing::failed("Error reading music files")
            }
        }
    }
}

fn public_url(name: &str) -> String {
    format!("{}/{}", PUBLIC_PREFIX, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn media_dir(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        assert!(MediaKind::Image.matches("a.JPG"));
        assert!(MediaKind::Image.matches("b.WebP"));
        assert!(!MediaKind::Image.matches("c.mp3"));
        assert!(!MediaKind::Image.matches("jpg"));
        assert!(MediaKind::Audio.matches("song.M4A"));
        assert!(!MediaKind::Audio.matches("song.flac"));
    }

    #[test]
    fn test_list_photos_in_name_order() {
        let dir = media_dir(&["b.jpg", "notes.txt", "a.png", "c.GIF"]);
        let listing = AssetScanner::new(dir.path()).list_photos();

        assert!(listing.success);
        assert_eq!(listing.count, Some(3));
        let ids: Vec<u32> = listing.photos.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(listing.photos[0].url, "/public/a.png");
        assert_eq!(listing.photos[0].filename.as_deref(), Some("a.png"));
        assert_eq!(listing.photos[1].title, "Memory 2");
        assert_eq!(listing.photos[2].filename.as_deref(), Some("c.GIF"));
    }

    #[test]
    fn test_empty_dir_is_success_with_no_photos() {
        let dir = media_dir(&["readme.md"]);
        let listing = AssetScanner::new(dir.path()).list_photos();
        assert!(listing.success);
        assert!(listing.photos.is_empty());
    }

    #[test]
    fn test_missing_dir_fails_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = AssetScanner::new(dir.path().join("missing"));

        let photos = scanner.list_photos();
        assert!(!photos.success);
        assert!(photos.photos.is_empty());

        let music = scanner.list_music();
        assert!(!music.success);
        assert_eq!(music.message.as_deref(), Some("Error reading music files"));
    }

    #[test]
    fn test_list_music_picks_first() {
        let dir = media_dir(&["z.ogg", "b.mp3", "a.png"]);
        let music = AssetScanner::new(dir.path()).list_music();
        assert!(music.success);
        assert_eq!(music.music.as_deref(), Some("/public/b.mp3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = media_dir(&["ok.png"]);
        let bad = OsStr::from_bytes(b"bad\xff.png");
        if fs::write(dir.path().join(bad), b"x").is_err() {
            // Filesystem refuses such names; nothing to check
            return;
        }

        let listing = AssetScanner::new(dir.path()).list_photos();
        assert_eq!(listing.count, Some(1));
        assert_eq!(listing.photos[0].url, "/public/ok.png");
    }

    #[test]
    fn test_list_music_none_found() {
        let dir = media_dir(&["a.png", "b.jpg"]);
        let music = AssetScanner::new(dir.path()).list_music();
        assert!(!music.success);
        assert_eq!(music.message.as_deref(), Some("No music file found"));
    }
}
