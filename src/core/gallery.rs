//! Gallery state: ordered photo list plus the viewport index.
//!
//! **Architecture**: GalleryState does NOT own a render surface. Every
//! mutation returns a [`GalleryChange`] and the caller applies it with
//! [`present`]. This keeps the state testable without any UI and lets the
//! controller decide when to redraw.
//!
//! # Invariants
//!
//! - `current_index < photos.len()` whenever `photos` is non-empty
//! - empty gallery: navigation is a no-op, counter reads `0 / 0`
//! - the gallery never holds more than [`MAX_GALLERY_PHOTOS`] after an upload
//!
//! # Upload batches
//!
//! Photo uploads convert asynchronously. Each batch takes an [`UploadTicket`]
//! from [`GalleryState::begin_upload`]; only the most recently issued ticket
//! may commit. A slower, older batch finishing late is rejected with
//! [`GalleryError::StaleBatch`] instead of interleaving with the newer one.

use log::{debug, trace};

use super::photo::Photo;
use super::upload::EncodedFile;

/// Hard cap on gallery size after an upload commit
pub const MAX_GALLERY_PHOTOS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

/// What a mutation did, so the surface can redraw minimally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryChange {
    /// Structure changed: rebuild slides and thumbnails
    Rebuilt,
    /// Only the viewport index moved
    Moved(usize),
    Unchanged,
}

/// Identifies one upload batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    IndexOutOfRange { index: usize, len: usize },
    StaleBatch { ticket: u64, latest: u64 },
}

impl std::fmt::Display for GalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GalleryError::IndexOutOfRange { index, len } => {
                write!(f, "Photo index {} out of range (gallery has {})", index, len)
            }
            GalleryError::StaleBatch { ticket, latest } => {
                write!(f, "Upload batch {} superseded by batch {}", ticket, latest)
            }
        }
    }
}

impl std::error::Error for GalleryError {}

/// Anything that can show slides and thumbnails.
///
/// Exactly one thumbnail is active at a time; it must match the index
/// passed to the most recent `render_all` / `set_active`.
pub trait RenderSurface {
    /// Rebuild all slides and thumbnails
    fn render_all(&mut self, photos: &[Photo], active: usize);
    /// Move the viewport and active thumbnail without rebuilding
    fn set_active(&mut self, index: usize);
    /// Show the `current / total` counter
    fn update_counter(&mut self, _label: &str) {}
}

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    photos: Vec<Photo>,
    current_index: usize,
    last_ticket: u64,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Photo> {
        self.photos.get(self.current_index)
    }

    /// `"3 / 6"`, or `"0 / 0"` for an empty gallery
    pub fn counter_label(&self) -> String {
        if self.photos.is_empty() {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.current_index + 1, self.photos.len())
    }

    /// Replace the list wholesale and reset the viewport.
    pub fn initialize(&mut self, photos: Vec<Photo>) -> GalleryChange {
        debug!("Gallery initialized with {} photo(s)", photos.len());
        self.photos = photos;
        self.current_index = 0;
        GalleryChange::Rebuilt
    }

    /// Step one photo, wrapping at both ends.
    pub fn navigate(&mut self, direction: Direction) -> GalleryChange {
        let len = self.photos.len();
        if len == 0 {
            return GalleryChange::Unchanged;
        }
        let len = len as isize;
        let next = (self.current_index as isize + direction.delta() + len) % len;
        self.current_index = next as usize;
        trace!("Gallery navigate {:?} -> {}", direction, self.current_index);
        GalleryChange::Moved(self.current_index)
    }

    /// Jump straight to `index` (thumbnail click).
    pub fn go_to(&mut self, index: usize) -> Result<GalleryChange, GalleryError> {
        if index >= self.photos.len() {
            return Err(GalleryError::IndexOutOfRange {
                index,
                len: self.photos.len(),
            });
        }
        self.current_index = index;
        Ok(GalleryChange::Moved(index))
    }

    /// Start a new upload batch; supersedes every earlier ticket.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.last_ticket += 1;
        UploadTicket(self.last_ticket)
    }

    /// True while no newer batch has been started
    pub fn is_latest_upload(&self, ticket: UploadTicket) -> bool {
        ticket.0 == self.last_ticket
    }

    /// Append a finished batch, keep the first [`MAX_GALLERY_PHOTOS`] of the
    /// concatenation and jump to the first photo.
    pub fn commit_upload(
        &mut self,
        ticket: UploadTicket,
        files: Vec<EncodedFile>,
    ) -> Result<GalleryChange, GalleryError> {
        if !self.is_latest_upload(ticket) {
            return Err(GalleryError::StaleBatch {
                ticket: ticket.0,
                latest: self.last_ticket,
            });
        }

        let base = self.photos.len();
        let uploaded = files.into_iter().enumerate().map(|(i, file)| {
            Photo::new(
                (base + i + 1) as u32,
                file.data_url,
                format!("Uploaded Photo {}", i + 1),
            )
        });
        self.photos.extend(uploaded);
        self.photos.truncate(MAX_GALLERY_PHOTOS);
        self.current_index = 0;

        debug!("Upload batch {} committed, gallery now {} photo(s)", ticket.0, self.photos.len());
        Ok(GalleryChange::Rebuilt)
    }
}

/// Apply a change to a surface, then refresh the counter.
pub fn present(change: GalleryChange, gallery: &GalleryState, surface: &mut dyn RenderSurface) {
    match change {
        GalleryChange::Rebuilt => surface.render_all(gallery.photos(), gallery.current_index()),
        GalleryChange::Moved(index) => surface.set_active(index),
        GalleryChange::Unchanged => return,
    }
    surface.update_counter(&gallery.counter_label());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(n: u32) -> Vec<Photo> {
        (1..=n).map(|id| Photo::new(id, format!("/public/{}.png", id), Photo::memory_title(id))).collect()
    }

    fn files(prefix: &str, n: usize) -> Vec<EncodedFile> {
        (0..n)
            .map(|i| EncodedFile {
                name: format!("{}{}.png", prefix, i),
                data_url: format!("data:image/png;base64,{}{}", prefix, i),
            })
            .collect()
    }

    /// Tracks which thumbnail is active, like a DOM would
    #[derive(Default)]
    struct ThumbStrip {
        active: Vec<bool>,
        counter: String,
        rebuilds: usize,
    }

    impl RenderSurface for ThumbStrip {
        fn render_all(&mut self, photos: &[Photo], active: usize) {
            self.rebuilds += 1;
            self.active = (0..photos.len()).map(|i| i == active).collect();
        }

        fn set_active(&mut self, index: usize) {
            for (i, a) in self.active.iter_mut().enumerate() {
                *a = i == index;
            }
        }

        fn update_counter(&mut self, label: &str) {
            self.counter = label.to_string();
        }
    }

    impl ThumbStrip {
        fn active_index(&self) -> Option<usize> {
            let hits: Vec<usize> = self.active.iter().enumerate().filter(|(_, a)| **a).map(|(i, _)| i).collect();
            assert!(hits.len() <= 1, "more than one active thumbnail");
            hits.first().copied()
        }
    }

    #[test]
    fn test_initialize_resets_index() {
        let mut g = GalleryState::new();
        g.initialize(photos(4));
        g.go_to(3).unwrap();
        assert_eq!(g.initialize(photos(2)), GalleryChange::Rebuilt);
        assert_eq!(g.current_index(), 0);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_navigate_wraps() {
        let mut g = GalleryState::new();
        g.initialize(photos(3));

        assert_eq!(g.navigate(Direction::Prev), GalleryChange::Moved(2));
        assert_eq!(g.navigate(Direction::Next), GalleryChange::Moved(0));
        g.go_to(2).unwrap();
        assert_eq!(g.navigate(Direction::Next), GalleryChange::Moved(0));
    }

    #[test]
    fn test_navigate_empty_is_noop() {
        let mut g = GalleryState::new();
        assert_eq!(g.navigate(Direction::Next), GalleryChange::Unchanged);
        assert_eq!(g.navigate(Direction::Prev), GalleryChange::Unchanged);
        assert_eq!(g.current_index(), 0);
        assert_eq!(g.counter_label(), "0 / 0");
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut g = GalleryState::new();
        g.initialize(photos(3));
        g.go_to(1).unwrap();

        let err = g.go_to(3).unwrap_err();
        assert_eq!(err, GalleryError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(g.current_index(), 1);
    }

    #[test]
    fn test_upload_keeps_first_eight() {
        let mut g = GalleryState::new();
        g.initialize(photos(5));
        g.go_to(4).unwrap();

        let ticket = g.begin_upload();
        g.commit_upload(ticket, files("new", 5)).unwrap();

        assert_eq!(g.len(), 8);
        assert_eq!(g.current_index(), 0);
        let urls: Vec<&str> = g.photos().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(&urls[..5], &["/public/1.png", "/public/2.png", "/public/3.png", "/public/4.png", "/public/5.png"]);
        assert_eq!(urls[5], "data:image/png;base64,new0");
        assert_eq!(urls[7], "data:image/png;base64,new2");
        assert_eq!(g.photos()[5].title, "Uploaded Photo 1");
        assert_eq!(g.photos()[5].id, 6);
    }

    #[test]
    fn test_upload_below_cap_appends_all() {
        let mut g = GalleryState::new();
        g.initialize(photos(2));
        let ticket = g.begin_upload();
        g.commit_upload(ticket, files("u", 3)).unwrap();
        assert_eq!(g.len(), 5);
    }

    #[test]
    fn test_stale_batch_rejected() {
        let mut g = GalleryState::new();
        g.initialize(photos(1));

        let first = g.begin_upload();
        let second = g.begin_upload();
        assert!(!g.is_latest_upload(first));
        assert!(g.is_latest_upload(second));

        g.commit_upload(second, files("b", 2)).unwrap();
        let err = g.commit_upload(first, files("a", 2)).unwrap_err();
        assert_eq!(err, GalleryError::StaleBatch { ticket: first.seq(), latest: second.seq() });
        assert_eq!(g.len(), 3);
        assert!(g.photos()[1].url.ends_with("b0"));
    }

    #[test]
    fn test_single_active_thumbnail_tracks_index() {
        let mut g = GalleryState::new();
        let mut strip = ThumbStrip::default();

        let change = g.initialize(photos(4));
        present(change, &g, &mut strip);
        assert_eq!(strip.active_index(), Some(0));
        assert_eq!(strip.counter, "1 / 4");

        let change = g.navigate(Direction::Prev);
        present(change, &g, &mut strip);
        assert_eq!(strip.active_index(), Some(g.current_index()));
        assert_eq!(strip.counter, "4 / 4");

        let ticket = g.begin_upload();
        let change = g.commit_upload(ticket, files("x", 2)).unwrap();
        present(change, &g, &mut strip);
        assert_eq!(strip.active_index(), Some(0));
        assert_eq!(strip.rebuilds, 2);
        assert_eq!(strip.counter, "1 / 6");
    }
}
