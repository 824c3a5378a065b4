//! Celebration - personalized celebration page backend and gallery engine
//!
//! Re-exports all modules for use by the binary target.

// Core engine (descriptors, loader, gallery, uploads, playback, events)
pub mod core;

// App modules
pub mod app;
pub mod cli;
pub mod config;
pub mod scanner;
pub mod server;
pub mod shell;

pub use app::CelebrationApp;
pub use core::event_bus::{BoxedEvent, EventBus, EventEmitter, downcast_event};
pub use core::gallery::{Direction, GalleryChange, GalleryState, RenderSurface};
pub use core::loader::{AssetLoader, AssetSource, HttpAssetSource};
pub use core::photo::Photo;
pub use core::playback::{MediaBackend, PlaybackControl};
pub use scanner::AssetScanner;
