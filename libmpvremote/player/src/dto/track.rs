use serde::Serialize;
use strum::EnumString;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Sub,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Track {
    pub index: i64,
    pub id: i64,
    #[serde(flatten)]
    pub details: TrackDetails,
    pub selected: bool,
    pub codec: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrackDetails {
    #[serde(rename_all = "kebab-case")]
    Video {
        demux_w: Option<i64>,
        demux_h: Option<i64>,
    },
    #[serde(rename_all = "kebab-case")]
    Audio {
        demux_channel_count: Option<i64>,
        demux_channels: Option<String>,
        demux_samplerate: Option<i64>,
        demux_bitrate: Option<i64>,
        lang: Option<String>,
        external_filename: Option<String>,
    },
    #[serde(rename_all = "kebab-case")]
    Sub {
        lang: Option<String>,
        external_filename: Option<String>,
    },
}

impl TrackDetails {
    pub fn track_type(&self) -> TrackType {
        match self {
            TrackDetails::Video { .. } => TrackType::Video,
            TrackDetails::Audio { .. } => TrackType::Audio,
            TrackDetails::Sub { .. } => TrackType::Sub,
        }
    }
}
