//! Plain-text render surface for the terminal preview.

use std::io::Write;

use crate::core::gallery::RenderSurface;
use crate::core::photo::Photo;

/// Writes slides/thumbnails as text lines to any writer.
///
/// Keeps the titles from the last full render so `set_active` can name the
/// current slide without access to the gallery.
pub struct TextSurface<W: Write> {
    out: W,
    titles: Vec<String>,
    active: Option<usize>,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            titles: Vec::new(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("Render output failed: {}", e);
        }
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    fn render_all(&mut self, photos: &[Photo], active: usize) {
        self.titles = photos.iter().map(|p| p.title.clone()).collect();
        self.active = if photos.is_empty() { None } else { Some(active) };

        self.line(&format!("Gallery ({} photos)", photos.len()));
        for (i, photo) in photos.iter().enumerate() {
            let marker = if i == active { '*' } else { ' ' };
            let url = if photo.url.starts_with("data:") {
                "(embedded)"
            } else {
                photo.url.as_str()
            };
            self.line(&format!(" {} {:>2}. {:<20} {}", marker, i + 1, photo.title, url));
        }
    }

    fn set_active(&mut self, index: usize) {
        self.active = Some(index);
        let title = self.titles.get(index).cloned().unwrap_or_default();
        self.line(&format!("-> {}", title));
    }

    fn update_counter(&mut self, label: &str) {
        self.line(&format!("   [{}]", label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_output() {
        let mut s = TextSurface::new(Vec::new());
        let photos = vec![
            Photo::new(1, "/public/a.png", "Memory 1"),
            Photo::new(2, "data:image/png;base64,AA", "Uploaded Photo 1"),
        ];
        s.render_all(&photos, 0);
        s.set_active(1);
        s.update_counter("2 / 2");
        assert_eq!(s.active(), Some(1));

        let text = String::from_utf8(s.into_inner()).unwrap();
        assert!(text.contains("Gallery (2 photos)"));
        assert!(text.contains(" *  1. Memory 1"));
        assert!(text.contains("(embedded)"));
        assert!(text.contains("-> Uploaded Photo 1"));
        assert!(text.contains("[2 / 2]"));
    }
}
