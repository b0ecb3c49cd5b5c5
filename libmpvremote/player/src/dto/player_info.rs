use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerVersions {
    pub ffmpeg_version: Option<String>,
    pub mpv_version: Option<String>,
    pub libass_version: Option<String>,
}
