//! Application controller - CelebrationApp and its event handling.
//!
//! - `events` - dispatch of input events and finished upload batches
//! - `surface` - text render surface for the terminal preview
//!
//! CelebrationApp owns the single [`GalleryState`] and [`PlaybackControl`].
//! Input handlers talk to it only through the event bus, and all state
//! mutation happens on the thread calling [`CelebrationApp::process_events`].

mod events;
pub mod surface;

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, trace};

use crate::core::event_bus::{Event, EventBus, EventEmitter};
use crate::core::events::StatusChangedEvent;
use crate::core::gallery::{GalleryState, RenderSurface, present};
use crate::core::loader::{AssetLoader, AssetSource};
use crate::core::playback::{MediaBackend, PlaybackControl};
use crate::core::upload::UploadBatch;

/// Name shown when the visitor leaves the field blank
pub const DEFAULT_NAME: &str = "Friend";

pub struct CelebrationApp<S: RenderSurface, B: MediaBackend> {
    pub(crate) gallery: GalleryState,
    pub(crate) playback: PlaybackControl<B>,
    pub(crate) surface: S,
    event_bus: EventBus,
    loader: AssetLoader,
    status: String,
    photo_count_label: String,
    music_count_label: String,
    display_name: Option<String>,
    started: bool,
    pending_uploads: usize,
    upload_tx: Sender<UploadBatch>,
    upload_rx: Receiver<UploadBatch>,
}

impl<S: RenderSurface, B: MediaBackend> CelebrationApp<S, B> {
    pub fn new(surface: S, backend: B, loader: AssetLoader) -> Self {
        let (upload_tx, upload_rx) = crossbeam_channel::unbounded();
        Self {
            gallery: GalleryState::new(),
            playback: PlaybackControl::new(backend),
            surface,
            event_bus: EventBus::new(),
            loader,
            status: String::new(),
            photo_count_label: "0".to_string(),
            music_count_label: "0".to_string(),
            display_name: None,
            started: false,
            pending_uploads: 0,
            upload_tx,
            upload_rx,
        }
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    pub fn playback(&self) -> &PlaybackControl<B> {
        &self.playback
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Handle for input sources
    pub fn emitter(&self) -> EventEmitter {
        self.event_bus.emitter()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn photo_count_label(&self) -> &str {
        &self.photo_count_label
    }

    pub fn music_count_label(&self) -> &str {
        &self.music_count_label
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        info!("Status: {}", self.status);
        self.event_bus.emit(StatusChangedEvent(self.status.clone()));
    }

    pub(crate) fn set_photo_count_label(&mut self, label: String) {
        self.photo_count_label = label;
    }

    pub(crate) fn set_music_count_label(&mut self, label: &str) {
        self.music_count_label = label.to_string();
    }

    /// Upload batches spawned but not yet committed or discarded
    pub fn pending_uploads(&self) -> usize {
        self.pending_uploads
    }

    pub(crate) fn upload_sender(&mut self) -> Sender<UploadBatch> {
        self.pending_uploads += 1;
        self.upload_tx.clone()
    }

    /// Populate gallery and music from `source`, falling back where needed.
    pub fn load_assets(&mut self, source: &dyn AssetSource) {
        let photos = self.loader.load_photos(source);
        self.photo_count_label = photos.count_label();
        let change = self.gallery.initialize(photos.photos);
        present(change, &self.gallery, &mut self.surface);

        let music = self.loader.load_music(source);
        self.playback.set_source(music.source.clone());
        self.music_count_label = music.count_label().to_string();
        self.set_status(music.status_message());
    }

    /// Leave the welcome screen: show the name and try to start the music.
    pub fn start_celebration(&mut self, name: &str) {
        let name = name.trim();
        let name = if name.is_empty() { DEFAULT_NAME } else { name };
        info!("Starting celebration for {}", name);
        self.display_name = Some(name.to_string());
        self.started = true;

        if let Err(e) = self.playback.play() {
            debug!("Autoplay on start refused: {}", e);
            self.set_status(crate::core::playback::STATUS_NEEDS_INTERACTION);
        }
    }

    /// Dispatch queued input events, then commit any finished upload batches.
    /// Returns the number of events and batches handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        for event in self.event_bus.poll() {
            if self.handle_event(&event) {
                handled += 1;
            } else {
                trace!("Not handled here: {}", (*event).type_name());
            }
        }
        while let Ok(batch) = self.upload_rx.try_recv() {
            self.receive_batch(batch);
            handled += 1;
        }
        handled
    }

    /// Block until one upload batch finishes (or `timeout` passes) and commit it.
    pub fn wait_for_upload(&mut self, timeout: Duration) -> bool {
        match self.upload_rx.recv_timeout(timeout) {
            Ok(batch) => {
                self.receive_batch(batch);
                true
            }
            Err(_) => false,
        }
    }

    fn receive_batch(&mut self, batch: UploadBatch) {
        self.pending_uploads = self.pending_uploads.saturating_sub(1);
        self.apply_upload_batch(batch);
    }
}
