//! Media server: discovery API plus static files.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐                     ┌──────────────────────┐
//! │   rouille request loop   │  ── read_dir ────▶  │   media directory    │
//! │                          │                     │   (public/)          │
//! │  GET /api/photos         │  ◀── PhotoListing ──│                      │
//! │  GET /api/music          │  ◀── MusicListing ──│                      │
//! │  GET /public/<file>      │  ◀── file bytes ────│                      │
//! └──────────────────────────┘                     └──────────────────────┘
//! ```
//!
//! - **rouille** - sync HTTP server, one thread per request
//! - no caching: every discovery call rescans
//!
//! # Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/api/photos`     | Image descriptors, `success` flag    |
//! | GET    | `/api/music`      | First audio file or failure message  |
//! | GET    | `/api/health`     | Health check                         |
//! | GET    | `/public/<file>`  | File from the media directory        |
//! | GET    | `/<file>`         | Same, e.g. `/music.mp3`              |
//! | GET    | anything else     | Index page if configured, else 404   |
//!
//! Paths with a media extension never fall back to the index page, so a
//! client probing for `/music.mp3` sees a 404 rather than HTML.

mod api;

pub use api::{ApiServer, RunningServer, ServerContext, handle_request};
