//! Core modules - descriptors, discovery, gallery, uploads, playback, events
//!
//! Nothing here depends on a UI or on the HTTP server.

pub mod event_bus;
pub mod events;
pub mod gallery;
pub mod loader;
pub mod photo;
pub mod playback;
pub mod upload;

pub use event_bus::EventBus;
pub use gallery::{Direction, GalleryChange, GalleryError, GalleryState, RenderSurface};
pub use loader::{AssetLoader, AssetSource, HttpAssetSource};
pub use photo::Photo;
pub use playback::{MediaBackend, PlaybackControl};
