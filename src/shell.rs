//! Interactive terminal preview.
//!
//! Reads one command per line, turns it into an input event and lets the
//! controller process it, exactly like button clicks would on a page.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::app::CelebrationApp;
use crate::core::events::*;
use crate::core::gallery::{Direction, RenderSurface};
use crate::core::playback::MediaBackend;

/// How long `upload` waits for its batch before returning to the prompt
const UPLOAD_WAIT: Duration = Duration::from_secs(30);

pub const HELP: &str = "\
Commands:
  next | prev          step through photos
  goto N               show photo N (1-based, like a thumbnail click)
  upload FILE..        add photos (max 8 per batch, gallery keeps 8)
  music FILE           replace the background music
  play                 toggle play/pause
  vol N                volume 0-100
  focus                page visible again (resume music)
  start [NAME]         leave the welcome screen
  status               show status line and counters
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Navigate(Direction),
    GoTo(usize),
    Upload(Vec<PathBuf>),
    Music(PathBuf),
    Toggle,
    Volume(f32),
    Focus,
    Start(String),
    Status,
    Help,
    Quit,
}

/// Parse one input line. Thumbnail numbers are 1-based.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "next" | "n" => Ok(ShellCommand::Navigate(Direction::Next)),
        "prev" | "p" => Ok(ShellCommand::Navigate(Direction::Prev)),
        "goto" | "g" => {
            let n: usize = rest.parse().map_err(|_| format!("Invalid photo number: {:?}", rest))?;
            if n == 0 {
                return Err("Photo numbers start at 1".to_string());
            }
            Ok(ShellCommand::GoTo(n - 1))
        }
        "upload" => {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err("upload needs at least one file".to_string());
            }
            Ok(ShellCommand::Upload(paths))
        }
        "music" if !rest.is_empty() => Ok(ShellCommand::Music(PathBuf::from(rest))),
        "music" => Err("music needs a file".to_string()),
        "play" | "pause" => Ok(ShellCommand::Toggle),
        "vol" | "volume" => match rest.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(ShellCommand::Volume(v)),
            _ => Err(format!("Invalid volume: {:?}", rest)),
        },
        "focus" => Ok(ShellCommand::Focus),
        "start" => Ok(ShellCommand::Start(rest.to_string())),
        "status" | "" => Ok(ShellCommand::Status),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command: {} (try help)", other)),
    }
}

/// Run the command loop until `quit` or end of input.
pub fn run<S, B, R, W>(app: &mut CelebrationApp<S, B>, input: R, out: &mut W) -> Result<()>
where
    S: RenderSurface,
    B: MediaBackend,
    R: BufRead,
    W: Write,
{
    let emitter = app.emitter();
    writeln!(out, "{}", HELP)?;

    for line in input.lines() {
        let line = line?;
        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                writeln!(out, "{}", msg)?;
                continue;
            }
        };

        let mut wait_upload = false;
        match cmd {
            ShellCommand::Navigate(dir) => emitter.emit(NavigateEvent(dir)),
            ShellCommand::GoTo(i) => emitter.emit(GoToPhotoEvent(i)),
            ShellCommand::Upload(paths) => {
                emitter.emit(UploadPhotosEvent(paths));
                wait_upload = true;
            }
            ShellCommand::Music(path) => emitter.emit(UploadMusicEvent(path)),
            ShellCommand::Toggle => emitter.emit(TogglePlayEvent),
            ShellCommand::Volume(v) => emitter.emit(SetVolumeEvent(v)),
            ShellCommand::Focus => emitter.emit(SurfaceVisibleEvent),
            ShellCommand::Start(name) => emitter.emit(StartCelebrationEvent(name)),
            ShellCommand::Status => {}
            ShellCommand::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            ShellCommand::Quit => break,
        }

        app.process_events();
        if wait_upload {
            while app.pending_uploads() > 0 {
                if !app.wait_for_upload(UPLOAD_WAIT) {
                    writeln!(out, "Upload still converting, continuing")?;
                    break;
                }
            }
        }
        print_status(app, out)?;
    }
    Ok(())
}

fn print_status<S: RenderSurface, B: MediaBackend, W: Write>(
    app: &CelebrationApp<S, B>,
    out: &mut W,
) -> Result<()> {
    let playback = app.playback();
    let gallery = app.gallery();
    writeln!(
        out,
        "{} | photos: {} | music: {} | {} vol {:.0}% | {}",
        app.display_name().unwrap_or("(welcome)"),
        app.photo_count_label(),
        app.music_count_label(),
        if playback.is_playing() { "playing" } else { "paused" },
        playback.volume() * 100.0,
        app.status(),
    )?;
    if let Some(photo) = gallery.current() {
        writeln!(out, "  [{}] {}", gallery.counter_label(), photo.title)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::surface::TextSurface;
    use crate::core::loader::AssetLoader;
    use crate::core::playback::SilentBackend;
    use crate::scanner::AssetScanner;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("next"), Ok(ShellCommand::Navigate(Direction::Next)));
        assert_eq!(parse_command(" P "), Ok(ShellCommand::Navigate(Direction::Prev)));
        assert_eq!(parse_command("goto 3"), Ok(ShellCommand::GoTo(2)));
        assert!(parse_command("goto 0").is_err());
        assert!(parse_command("goto x").is_err());
        assert_eq!(parse_command("vol 40"), Ok(ShellCommand::Volume(40.0)));
        assert!(parse_command("vol NaN").is_err());
        assert!(parse_command("vol inf").is_err());
        assert_eq!(
            parse_command("upload a.png b.jpg"),
            Ok(ShellCommand::Upload(vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]))
        );
        assert!(parse_command("upload").is_err());
        assert_eq!(parse_command("start Mia Rose"), Ok(ShellCommand::Start("Mia Rose".into())));
        assert_eq!(parse_command(""), Ok(ShellCommand::Status));
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_session() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"a").unwrap();
        std::fs::write(dir.path().join("b.png"), b"b").unwrap();

        let mut app = CelebrationApp::new(
            TextSurface::new(Vec::new()),
            SilentBackend::default(),
            AssetLoader::default(),
        );
        app.load_assets(&AssetScanner::new(dir.path()));

        let script = "start Mia\nnext\nnext\ngoto 2\nvol 25\nbogus\nquit\nnext\n";
        let mut out = Vec::new();
        run(&mut app, script.as_bytes(), &mut out).unwrap();

        assert_eq!(app.display_name(), Some("Mia"));
        assert_eq!(app.gallery().current_index(), 1);
        assert!(app.playback().is_playing());
        assert!((app.playback().volume() - 0.25).abs() < f32::EPSILON);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Unknown command: bogus"));
        assert!(text.contains("Mia | photos: 2"));
        assert!(text.contains("  [2 / 2] Memory 2"));
    }
}
