//! Background music control with a single audio source.
//!
//! **Architecture**: PlaybackControl holds the boolean play state and the
//! current source; the platform player sits behind [`MediaBackend`]. It is
//! independent of the gallery.
//!
//! # Toggle semantics
//!
//! `toggle()` flips `is_playing` as part of the same call whether or not the
//! backend accepted the start. A rejected start (autoplay policy) leaves
//! `is_playing == true` and reports that a manual click is needed. This
//! matches the page this was built for; the state can therefore diverge from
//! real playback until the next toggle.
//!
//! `play()` is the strict variant used when the celebration starts: the flag
//! is only set when the backend accepts.

use log::{debug, info};

/// Status shown when toggling without any source
pub const STATUS_NO_SOURCE: &str = "Please upload music first!";
/// Status shown when the platform blocks playback
pub const STATUS_NEEDS_INTERACTION: &str = "Click play button to start music";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Platform refused to start (autoplay restriction)
    Rejected(String),
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::Rejected(e) => write!(f, "Playback rejected: {}", e),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Platform audio player
pub trait MediaBackend {
    fn start(&mut self, source: &str) -> Result<(), PlaybackError>;
    fn stop(&mut self);
    /// `volume` in 0.0..=1.0
    fn set_volume(&mut self, volume: f32);
}

/// Backend that plays nothing and accepts everything (terminal preview)
#[derive(Debug, Default)]
pub struct SilentBackend {
    pub volume: f32,
}

impl MediaBackend for SilentBackend {
    fn start(&mut self, source: &str) -> Result<(), PlaybackError> {
        info!("Playing {}", short_source(source));
        Ok(())
    }

    fn stop(&mut self) {
        info!("Music paused");
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

/// Result of [`PlaybackControl::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    NoSource,
    Started,
    Paused,
    /// Backend refused; `is_playing` was still flipped
    Rejected,
}

impl ToggleOutcome {
    /// User-visible status, if this outcome has one
    pub fn status_message(self) -> Option<&'static str> {
        match self {
            ToggleOutcome::NoSource => Some(STATUS_NO_SOURCE),
            ToggleOutcome::Rejected => Some(STATUS_NEEDS_INTERACTION),
            ToggleOutcome::Started | ToggleOutcome::Paused => None,
        }
    }
}

pub struct PlaybackControl<B: MediaBackend> {
    backend: B,
    source: Option<String>,
    is_playing: bool,
    volume: f32,
    current_song: Option<String>,
}

impl<B: MediaBackend> PlaybackControl<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            source: None,
            is_playing: false,
            volume: 1.0,
            current_song: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn current_song(&self) -> Option<&str> {
        self.current_song.as_deref()
    }

    /// Replace the single active source. Does not start playback.
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        debug!("Music source set: {}", short_source(&source));
        self.source = Some(source);
    }

    pub fn set_current_song(&mut self, name: impl Into<String>) {
        self.current_song = Some(name.into());
    }

    /// Flip play/pause. See module docs for the rejection case.
    pub fn toggle(&mut self) -> ToggleOutcome {
        let Some(source) = self.source.as_deref() else {
            return ToggleOutcome::NoSource;
        };

        let outcome = if self.is_playing {
            self.backend.stop();
            ToggleOutcome::Paused
        } else {
            match self.backend.start(source) {
                Ok(()) => ToggleOutcome::Started,
                Err(e) => {
                    debug!("{}", e);
                    ToggleOutcome::Rejected
                }
            }
        };
        self.is_playing = !self.is_playing;
        outcome
    }

    /// Start playback if a source exists. Only a successful start sets `is_playing`.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(source) = self.source.as_deref() else {
            return Ok(());
        };
        self.backend.start(source)?;
        self.is_playing = true;
        Ok(())
    }

    /// Volume as a 0-100 percentage; out-of-range values are clamped, NaN is ignored.
    pub fn set_volume(&mut self, percent: f32) {
        if percent.is_nan() {
            debug!("Ignoring NaN volume, keeping {}", self.volume);
            return;
        }
        self.volume = percent.clamp(0.0, 100.0) / 100.0;
        self.backend.set_volume(self.volume);
    }

    /// Surface visible again: best-effort restart when playing.
    pub fn resume_on_return(&mut self) {
        if !self.is_playing {
            return;
        }
        if let Some(source) = self.source.as_deref() {
            if let Err(e) = self.backend.start(source) {
                debug!("Resume ignored: {}", e);
            }
        }
    }
}

/// Data URLs are huge; keep logs readable
fn short_source(source: &str) -> &str {
    if source.starts_with("data:") {
        source.split(',').next().unwrap_or(source)
    } else {
        source
    }
}
