use celebration::app::surface::TextSurface;
use celebration::cli::{Args, Command};
use celebration::config::{self, PathConfig, Settings};
use celebration::core::events::{SetVolumeEvent, StartCelebrationEvent};
use celebration::core::loader::{AssetLoader, AssetSource, HttpAssetSource};
use celebration::core::playback::SilentBackend;
use celebration::scanner::AssetScanner;
use celebration::server::ApiServer;
use celebration::{CelebrationApp, shell};

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

fn init_logging(args: &Args, path_config: &PathConfig) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let (log_level, default_level) = match args.verbosity {
        0 => (log::LevelFilter::Warn, "warn"),
        1 => (log::LevelFilter::Info, "info"),
        2 => (log::LevelFilter::Debug, "debug"),
        _ => (log::LevelFilter::Trace, "trace"),
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .clone()
            .unwrap_or_else(|| config::config_file(config::LOG_FILE, path_config));
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("tiny_http", log::LevelFilter::Warn)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging (respects RUST_LOG if set)
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("tiny_http", log::LevelFilter::Warn)
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

fn serve(
    mut settings: Settings,
    port: Option<u16>,
    media_dir: Option<PathBuf>,
    index: Option<PathBuf>,
) -> Result<()> {
    settings.apply_env();
    if let Some(port) = port {
        settings.port = port;
    }
    if let Some(dir) = media_dir {
        settings.media_dir = dir;
    }
    if index.is_some() {
        settings.index_file = index;
    }

    println!("Server running on http://localhost:{}", settings.port);
    println!("Put your photos and music in '{}'", settings.media_dir.display());
    ApiServer::new(&settings).run()
}

fn preview(
    settings: Settings,
    server: Option<String>,
    local: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let source: Box<dyn AssetSource> = match local {
        Some(dir) => {
            info!("Previewing local directory {}", dir.display());
            Box::new(AssetScanner::new(dir))
        }
        None => {
            let url = server.unwrap_or_else(|| settings.server_url.clone());
            info!("Previewing server {}", url);
            Box::new(HttpAssetSource::new(&url)?)
        }
    };

    let loader = AssetLoader::new(&settings.placeholder_template, &settings.fallback_track);
    let surface = TextSurface::new(std::io::stdout());
    let mut app = CelebrationApp::new(surface, SilentBackend::default(), loader);

    app.load_assets(source.as_ref());
    app.emitter().emit(SetVolumeEvent(settings.default_volume));
    if let Some(name) = name {
        app.emitter().emit(StartCelebrationEvent(name));
    }
    app.process_events();

    let stdin = std::io::stdin();
    shell::run(&mut app, stdin.lock(), &mut std::io::stdout())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());

    init_logging(&args, &path_config)?;
    debug!("Command-line args: {:?}", args);

    let settings_path = config::config_file(config::SETTINGS_FILE, &path_config);
    info!("Config path: {}", settings_path.display());
    let settings = Settings::load(&settings_path)?;

    match args.command.clone().unwrap_or(Command::Serve {
        port: None,
        media_dir: None,
        index_file: None,
    }) {
        Command::Serve { port, media_dir, index_file } => serve(settings, port, media_dir, index_file),
        Command::Preview { server, local, name } => preview(settings, server, local, name),
    }
}
