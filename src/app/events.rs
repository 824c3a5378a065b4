//! Event dispatch for CelebrationApp.
//!
//! Each input event maps to one state mutation followed by a surface update.
//! Photo uploads are the only asynchronous path: the handler takes an upload
//! ticket and hands conversion to a background thread; the finished batch
//! comes back through the upload channel and is committed in
//! [`CelebrationApp::apply_upload_batch`].

use log::{debug, info, warn};

use super::CelebrationApp;
use crate::core::event_bus::{BoxedEvent, downcast_event};
use crate::core::events::*;
use crate::core::gallery::{RenderSurface, present};
use crate::core::playback::MediaBackend;
use crate::core::upload::{UploadBatch, encode_file, spawn_photo_batch};

impl<S: RenderSurface, B: MediaBackend> CelebrationApp<S, B> {
    /// Handle one polled event. Returns false for events this controller ignores.
    pub(crate) fn handle_event(&mut self, event: &BoxedEvent) -> bool {
        if let Some(e) = downcast_event::<NavigateEvent>(event) {
            let change = self.gallery.navigate(e.0);
            present(change, &self.gallery, &mut self.surface);
            return true;
        }

        if let Some(e) = downcast_event::<GoToPhotoEvent>(event) {
            match self.gallery.go_to(e.0) {
                Ok(change) => present(change, &self.gallery, &mut self.surface),
                Err(err) => warn!("{}", err),
            }
            return true;
        }

        if let Some(e) = downcast_event::<UploadPhotosEvent>(event) {
            if e.0.is_empty() {
                return true;
            }
            let ticket = self.gallery.begin_upload();
            debug!("Upload batch {} started with {} file(s)", ticket.seq(), e.0.len());
            // Detached: completion arrives on the upload channel
            let _ = spawn_photo_batch(ticket, e.0.clone(), self.upload_sender());
            return true;
        }

        if let Some(e) = downcast_event::<UploadMusicEvent>(event) {
            match encode_file(&e.0) {
                Ok(file) => {
                    self.playback.set_source(file.data_url.clone());
                    self.playback.set_current_song(file.stem());
                    self.set_music_count_label("1");
                    self.set_status(format!("Uploaded music: {}", file.name));
                    if self.is_started() && self.playback.is_playing() {
                        if let Err(err) = self.playback.play() {
                            debug!("Uploaded music did not start: {}", err);
                        }
                    }
                }
                Err(err) => {
                    warn!("Music upload failed: {:#}", err);
                    self.set_status(format!("Could not read music: {}", e.0.display()));
                }
            }
            return true;
        }

        if downcast_event::<TogglePlayEvent>(event).is_some() {
            let outcome = self.playback.toggle();
            debug!("Toggle -> {:?} (playing: {})", outcome, self.playback.is_playing());
            if let Some(msg) = outcome.status_message() {
                self.set_status(msg);
            }
            return true;
        }

        if let Some(e) = downcast_event::<SetVolumeEvent>(event) {
            self.playback.set_volume(e.0);
            return true;
        }

        if downcast_event::<SurfaceVisibleEvent>(event).is_some() {
            self.playback.resume_on_return();
            return true;
        }

        if let Some(e) = downcast_event::<StartCelebrationEvent>(event) {
            self.start_celebration(&e.0);
            return true;
        }

        false
    }

    /// Commit a finished batch if it is still the latest one.
    pub(crate) fn apply_upload_batch(&mut self, batch: UploadBatch) {
        if !self.gallery.is_latest_upload(batch.ticket) {
            info!("Discarding superseded upload batch {}", batch.ticket.seq());
            return;
        }
        if batch.files.is_empty() {
            warn!("Upload batch {} produced no readable photos", batch.ticket.seq());
            self.set_status("No photos could be read");
            return;
        }
        match self.gallery.commit_upload(batch.ticket, batch.files) {
            Ok(change) => {
                present(change, &self.gallery, &mut self.surface);
                self.set_photo_count_label(self.gallery.len().to_string());
                self.set_status(format!("Uploaded {} photos successfully!", batch.selected));
            }
            Err(e) => warn!("{}", e),
        }
    }
}
