//! Local upload conversion: files become embedded `data:` URLs.
//!
//! Files never leave the machine. A photo batch examines at most
//! [`MAX_UPLOAD_BATCH`] files, converts them in parallel and is delivered
//! once, in selection order, after every conversion has finished. The gallery
//! therefore never sees a partial batch.
//!
//! Background batches run on their own thread and report through a
//! crossbeam channel; the controller commits them with the batch's
//! [`UploadTicket`] so a superseded batch is dropped.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use crossbeam_channel::Sender;
use log::{debug, warn};
use rayon::prelude::*;

use super::gallery::UploadTicket;

/// Files examined per photo upload batch
pub const MAX_UPLOAD_BATCH: usize = 8;

/// One converted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// Original file name (no directory)
    pub name: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

impl EncodedFile {
    /// File name without its extension (used as the song label)
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

/// A finished photo batch
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub ticket: UploadTicket,
    /// Number of files the user selected (before the cap)
    pub selected: usize,
    pub files: Vec<EncodedFile>,
}

/// MIME type guessed from the file extension
pub fn mime_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read one file and embed it
pub fn encode_file(path: &Path) -> Result<EncodedFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read upload: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let data_url = to_data_url(mime_for(&name), &bytes);
    debug!("Encoded {} ({} bytes)", name, bytes.len());
    Ok(EncodedFile { name, data_url })
}

/// Convert the first [`MAX_UPLOAD_BATCH`] files in parallel, preserving order.
/// Unreadable files are skipped.
pub fn convert_photo_batch(paths: &[PathBuf]) -> Vec<EncodedFile> {
    let examined = &paths[..paths.len().min(MAX_UPLOAD_BATCH)];
    examined
        .par_iter()
        .filter_map(|path| match encode_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("Skipping upload: {:#}", e);
                None
            }
        })
        .collect()
}

/// Convert a batch on a background thread and send it when complete.
pub fn spawn_photo_batch(
    ticket: UploadTicket,
    paths: Vec<PathBuf>,
    tx: Sender<UploadBatch>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name(format!("celebration-upload-{}", ticket.seq()))
        .spawn(move || {
            let selected = paths.len();
            let files = convert_photo_batch(&paths);
            if tx.send(UploadBatch { ticket, selected, files }).is_err() {
                debug!("Upload batch {} finished after receiver closed", ticket.seq());
            }
        })
        .expect("Failed to spawn upload thread")
}
