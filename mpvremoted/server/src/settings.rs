use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use clap::builder::BoolishValueParser;
use libmpvremote_management::paths::default_database_path;
use libmpvremote_player::remote_player::{
    DEFAULT_STATUS_TIMEOUT, Settings, default_file_local_options_path,
};
use serde::Serialize;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PORT_RANGE_END: u16 = 8005;

/// Server options. Every option can also be set through its `MPVREMOTE_*` environment variable
/// or a `.env` file.
#[derive(Clone, Debug, Parser, Serialize)]
#[command(name = "mpvremoted", version, about = "HTTP remote control for mpv")]
#[serde(rename_all = "kebab-case")]
pub struct ServerSettings {
    /// mpv IPC socket or named pipe, as passed to mpv's `--input-ipc-server`
    #[arg(env = "MPVREMOTE_SOCKET")]
    pub socket: PathBuf,

    #[arg(long, env = "MPVREMOTE_ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub address: IpAddr,

    #[arg(long, env = "MPVREMOTE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Last port to try when the ones before it are taken
    #[arg(long, env = "MPVREMOTE_PORTRANGEEND", default_value_t = DEFAULT_PORT_RANGE_END)]
    pub port_range_end: u16,

    /// Store collections and watch progress in a local database
    #[arg(
        long,
        env = "MPVREMOTE_USELOCALDB",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    pub use_local_db: bool,

    /// Directories the file browser is allowed to list
    #[arg(
        long = "filebrowser-path",
        env = "MPVREMOTE_FILEBROWSERPATHS",
        value_delimiter = ';'
    )]
    pub filebrowser_paths: Vec<PathBuf>,

    /// Allow browsing outside the file browser paths and listing drives
    #[arg(
        long,
        env = "MPVREMOTE_UNSAFEFILEBROWSING",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    pub unsafe_filebrowsing: bool,

    #[arg(short, long, env = "MPVREMOTE_VERBOSE")]
    pub verbose: bool,

    /// Show player events on mpv's OSD
    #[arg(
        long,
        env = "MPVREMOTE_OSDMESSAGES",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    pub osd_messages: bool,

    /// How long a status request waits for the player before answering from cache
    #[arg(long, env = "MPVREMOTE_STATUSTIMEOUT", default_value_t = DEFAULT_STATUS_TIMEOUT.as_millis() as u64)]
    pub status_timeout_ms: u64,

    #[arg(long, env = "MPVREMOTE_FILELOCALOPTIONS")]
    pub file_local_options_path: Option<PathBuf>,

    #[arg(long, env = "MPVREMOTE_DATABASE")]
    pub database_path: Option<PathBuf>,
}

impl ServerSettings {
    pub fn player_settings(&self) -> Settings {
        Settings {
            osd_messages: self.osd_messages,
            status_timeout: Duration::from_millis(self.status_timeout_ms),
            file_local_options_path: self
                .file_local_options_path
                .clone()
                .unwrap_or_else(default_file_local_options_path),
        }
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        self.database_path.clone().or_else(default_database_path)
    }

    /// Ports to try binding, in order. Always contains at least `port`.
    pub fn ports(&self) -> RangeInclusive<u16> {
        self.port..=self.port_range_end.max(self.port)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
#[path = "./settings_test.rs"]
mod settings_test;
