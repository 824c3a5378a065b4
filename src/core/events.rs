//! User interaction events handled by the app controller.

use std::path::PathBuf;

use super::gallery::Direction;

// === Welcome ===

/// Enter the celebration with the typed name (may be blank)
#[derive(Clone, Debug)]
pub struct StartCelebrationEvent(pub String);

// === Gallery ===

#[derive(Clone, Debug)]
pub struct NavigateEvent(pub Direction);

/// Thumbnail click
#[derive(Clone, Debug)]
pub struct GoToPhotoEvent(pub usize);

/// Multi-select photo upload
#[derive(Clone, Debug)]
pub struct UploadPhotosEvent(pub Vec<PathBuf>);

// === Music ===

#[derive(Clone, Debug)]
pub struct UploadMusicEvent(pub PathBuf);

#[derive(Clone, Debug)]
pub struct TogglePlayEvent;

/// Volume slider, 0-100
#[derive(Clone, Debug)]
pub struct SetVolumeEvent(pub f32);

/// Page became visible / focused again
#[derive(Clone, Debug)]
pub struct SurfaceVisibleEvent;

// === Outgoing ===

/// Emitted by the controller whenever the status line changes
#[derive(Clone, Debug)]
pub struct StatusChangedEvent(pub String);
