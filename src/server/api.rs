//! HTTP endpoints using rouille.
//!
//! # Key types
//!
//! - [`ApiServer`] - binds the listener and runs the request loop
//! - [`RunningServer`] - handle to a server started in the background
//! - [`handle_request`] - pure request → response routing (used by tests)
//!
//! Every request rescans the media directory through [`AssetScanner`];
//! handlers are read-only and share no mutable state.

use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;

use anyhow::{Result, anyhow};
use rouille::{Request, Response};
use serde::Serialize;

use crate::config::Settings;
use crate::scanner::{AssetScanner, MediaKind, PUBLIC_PREFIX};

/// Generic API response
#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn ok_msg(msg: &str) -> Self {
        Self { success: true, message: Some(msg.to_string()), error: None }
    }

    fn err(msg: &str) -> Self {
        Self { success: false, message: None, error: Some(msg.to_string()) }
    }
}

/// Read-only state shared by all request threads
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub scanner: AssetScanner,
    pub index_file: Option<PathBuf>,
}

impl ServerContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            scanner: AssetScanner::new(&settings.media_dir),
            index_file: settings.index_file.clone(),
        }
    }
}

/// Media server
pub struct ApiServer {
    addr: String,
    context: Arc<ServerContext>,
}

impl ApiServer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            addr: settings.listen_addr(),
            context: Arc::new(ServerContext::from_settings(settings)),
        }
    }

    /// Bind and block until the server stops.
    pub fn run(self) -> Result<()> {
        self.start()?.wait()
    }

    /// Bind, then serve on a background thread.
    pub fn start(self) -> Result<RunningServer> {
        let context = Arc::clone(&self.context);
        let server = rouille::Server::new(&self.addr, move |request| handle_request(request, &context))
            .map_err(|e| anyhow!("Failed to bind {}: {}", self.addr, e))?;

        let addr = server.server_addr();
        log::info!("Server running on http://{}", addr);
        log::info!("Serving media from {}", self.context.scanner.dir().display());
        let (handle, stop) = server.stoppable();
        Ok(RunningServer { addr, handle, stop })
    }
}

/// Handle to a listening server
pub struct RunningServer {
    addr: SocketAddr,
    handle: thread::JoinHandle<()>,
    stop: mpsc::Sender<()>,
}

impl RunningServer {
    /// Bound address (resolves port 0)
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Block until the server thread exits
    pub fn wait(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| anyhow!("Server thread panicked"))
    }

    /// Ask the server to stop and wait for it (up to about a second)
    pub fn stop(self) -> Result<()> {
        // Send fails only if the thread is already gone
        let _ = self.stop.send(());
        self.wait()
    }
}

/// Route one request.
pub fn handle_request(request: &Request, context: &ServerContext) -> Response {
    if request.method() == "OPTIONS" {
        return Response::empty_204()
            .with_additional_header("Access-Control-Allow-Origin", "*")
            .with_additional_header("Access-Control-Allow-Methods", "GET, OPTIONS")
            .with_additional_header("Access-Control-Allow-Headers", "Content-Type");
    }

    log::trace!("{} {}", request.method(), request.url());

    let response = rouille::router!(request,
        (GET) ["/api/photos"] => {
            Response::json(&context.scanner.list_photos())
        },
        (GET) ["/api/music"] => {
            Response::json(&context.scanner.list_music())
        },
        (GET) ["/api/health"] => {
            Response::json(&ApiResponse::ok_msg("celebration media server"))
        },
        _ => {
            serve_static(request, context)
        }
    );

    response.with_additional_header("Access-Control-Allow-Origin", "*")
}

/// Media files under `/public/...` or at the root, then the index page.
fn serve_static(request: &Request, context: &ServerContext) -> Response {
    if request.method() != "GET" && request.method() != "HEAD" {
        return Response::json(&ApiResponse::err("Method not allowed")).with_status_code(405);
    }

    let dir = context.scanner.dir();
    if let Some(sub) = request.remove_prefix(PUBLIC_PREFIX) {
        let response = rouille::match_assets(&sub, dir);
        if response.is_success() {
            return response;
        }
    }

    let response = rouille::match_assets(request, dir);
    if response.is_success() {
        return response;
    }

    // Missing media must look missing to clients probing for it
    let url = request.url();
    if MediaKind::Image.matches(&url) || MediaKind::Audio.matches(&url) {
        return Response::json(&ApiResponse::err("Not found")).with_status_code(404);
    }

    if let Some(index) = &context.index_file {
        match File::open(index) {
            Ok(file) => return Response::from_file("text/html; charset=utf-8", file),
            Err(e) => log::debug!("Index page {} unavailable: {}", index.display(), e),
        }
    }

    Response::json(&ApiResponse::err("Not found")).with_status_code(404)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    fn get(context: &ServerContext, url: &str) -> Response {
        let request = Request::fake_http("GET", url, vec![], vec![]);
        handle_request(&request, context)
    }

    fn body(response: Response) -> String {
        let (mut reader, _) = response.data.into_reader_and_size();
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        out
    }

    fn json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body(response)).unwrap()
    }

    fn context(files: &[(&str, &str)]) -> (tempfile::TempDir, ServerContext) {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("public");
        fs::create_dir(&media).unwrap();
        for (name, content) in files {
            fs::write(media.join(name), content).unwrap();
        }
        let context = ServerContext {
            scanner: AssetScanner::new(&media),
            index_file: Some(dir.path().join("index.html")),
        };
        (dir, context)
    }

    #[test]
    fn test_photos_endpoint() {
        let (_dir, ctx) = context(&[("b.jpg", "b"), ("a.png", "a"), ("song.mp3", "m")]);
        let response = get(&ctx, "/api/photos");
        assert_eq!(response.status_code, 200);

        let v = json(response);
        assert_eq!(v["success"], true);
        assert_eq!(v["count"], 2);
        assert_eq!(v["photos"][0]["id"], 1);
        assert_eq!(v["photos"][0]["url"], "/public/a.png");
        assert_eq!(v["photos"][0]["title"], "Memory 1");
        assert_eq!(v["photos"][1]["filename"], "b.jpg");
    }

    #[test]
    fn test_photos_endpoint_scan_failure() {
        let ctx = ServerContext {
            scanner: AssetScanner::new("/definitely/not/here"),
            index_file: None,
        };
        let v = json(get(&ctx, "/api/photos"));
        assert_eq!(v, serde_json::json!({ "success": false, "photos": [] }));
    }

    #[test]
    fn test_music_endpoint() {
        let (_dir, ctx) = context(&[("tune.ogg", "o")]);
        let v = json(get(&ctx, "/api/music"));
        assert_eq!(v, serde_json::json!({ "success": true, "music": "/public/tune.ogg" }));

        let (_dir, ctx) = context(&[("a.png", "a")]);
        let v = json(get(&ctx, "/api/music"));
        assert_eq!(v, serde_json::json!({ "success": false, "message": "No music file found" }));
    }

    #[test]
    fn test_rescans_each_call() {
        let (dir, ctx) = context(&[]);
        assert_eq!(json(get(&ctx, "/api/photos"))["count"], 0);
        fs::write(dir.path().join("public").join("new.webp"), "w").unwrap();
        assert_eq!(json(get(&ctx, "/api/photos"))["count"], 1);
    }

    #[test]
    fn test_static_media() {
        let (_dir, ctx) = context(&[("a.png", "PNGDATA"), ("music.mp3", "MP3")]);

        let response = get(&ctx, "/public/a.png");
        assert_eq!(response.status_code, 200);
        assert_eq!(body(response), "PNGDATA");

        let response = get(&ctx, "/music.mp3");
        assert_eq!(response.status_code, 200);
        assert_eq!(body(response), "MP3");
    }

    #[test]
    fn test_index_fallback() {
        let (dir, ctx) = context(&[]);
        assert_eq!(get(&ctx, "/anything").status_code, 404);

        fs::write(dir.path().join("index.html"), "<h1>Happy</h1>").unwrap();
        let response = get(&ctx, "/anything");
        assert_eq!(response.status_code, 200);
        assert_eq!(body(response), "<h1>Happy</h1>");
    }

    #[test]
    fn test_missing_media_is_not_the_index() {
        let (dir, ctx) = context(&[("a.png", "a")]);
        fs::write(dir.path().join("index.html"), "<h1>Happy</h1>").unwrap();

        assert_eq!(get(&ctx, "/music.mp3").status_code, 404);
        assert_eq!(get(&ctx, "/public/gone.JPG").status_code, 404);
        assert_eq!(get(&ctx, "/party").status_code, 200);
    }

    #[test]
    fn test_started_server_answers_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            media_dir: dir.path().to_path_buf(),
            index_file: None,
            ..Settings::default()
        };
        let server = ApiServer::new(&settings).start().unwrap();
        assert_ne!(server.addr().port(), 0);

        let body: serde_json::Value = reqwest::blocking::get(format!("{}/api/health", server.url()))
            .unwrap()
            .json()
            .unwrap();
        assert_eq!(body["success"], true);
        server.stop().unwrap();
    }

    #[test]
    fn test_cors_and_preflight() {
        let (_dir, ctx) = context(&[]);
        let response = get(&ctx, "/api/health");
        assert!(response
            .headers
            .iter()
            .any(|(k, v)| k == "Access-Control-Allow-Origin" && v == "*"));

        let request = Request::fake_http("OPTIONS", "/api/photos", vec![], vec![]);
        assert_eq!(handle_request(&request, &ctx).status_code, 204);
    }
}
