use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Celebration page media server and terminal preview
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable logging to file (default: celebration.log in the config dir)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE", global = true)]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the discovery API and media files (default)
    Serve {
        /// Port to listen on (overrides settings and PORT)
        #[arg(short = 'p', long = "port", value_name = "PORT")]
        port: Option<u16>,

        /// Directory with photos and music
        #[arg(short = 'm', long = "media-dir", value_name = "DIR")]
        media_dir: Option<PathBuf>,

        /// Page served for unknown paths
        #[arg(long = "index", value_name = "FILE")]
        index_file: Option<PathBuf>,
    },

    /// Load the gallery and drive it from the terminal
    Preview {
        /// Media server base URL
        #[arg(short = 's', long = "server", value_name = "URL", conflicts_with = "local")]
        server: Option<String>,

        /// Scan a local directory instead of asking a server
        #[arg(long = "local", value_name = "DIR")]
        local: Option<PathBuf>,

        /// Start the celebration right away with this name
        #[arg(short = 'n', long = "name", value_name = "NAME")]
        name: Option<String>,
    },
}
