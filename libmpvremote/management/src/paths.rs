use std::env;
use std::path::PathBuf;

use directories::BaseDirs;

const MPV_HOME_VAR: &str = "MPV_HOME";

/// mpv's config directory: `MPV_HOME` when set, otherwise `mpv` under the user config dir.
pub fn mpv_home() -> Option<PathBuf> {
    env::var_os(MPV_HOME_VAR)
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().join("mpv")))
}

pub fn default_database_path() -> Option<PathBuf> {
    mpv_home().map(|home| home.join("scripts").join("mpvremote").join("remote.db"))
}
