use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_millis(500);
const FILE_LOCAL_OPTIONS_FILE: &str = "mpvremote-file-local-options.json";

#[derive(Clone, Debug)]
pub struct Settings {
    /// Show announcements on the player's OSD instead of only logging them.
    pub osd_messages: bool,
    pub status_timeout: Duration,
    pub file_local_options_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            osd_messages: false,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            file_local_options_path: default_file_local_options_path(),
        }
    }
}

pub fn default_file_local_options_path() -> PathBuf {
    std::env::temp_dir().join(FILE_LOCAL_OPTIONS_FILE)
}
