use std::collections::BTreeMap;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use super::chapter::Chapter;
use super::playlist_item::PlaylistItem;
use super::track::Track;

pub const DEFAULT_VOLUME_MAX: i64 = 100;
pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_SUB_VISIBILITY: bool = true;
pub const DEFAULT_SUB_FONT_SIZE: i64 = 55;
pub const DEFAULT_SUB_ASS_OVERRIDE: &str = "no";

/// Every field a status query can return.
/// The string form is the key used both in the response and in `exclude` query parameters.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SnapshotField {
    Pause,
    Mute,
    Filename,
    Duration,
    Position,
    Remaining,
    MediaTitle,
    Chapter,
    Volume,
    VolumeMax,
    Fullscreen,
    Speed,
    SubDelay,
    SubVisibility,
    AudioDelay,
    SubFontSize,
    SubAssOverride,
    Playlist,
    ChapterList,
    TrackList,
    Metadata,
    CurrentChapter,
}

impl SnapshotField {
    /// Name of the player property backing this field.
    pub fn property_name(&self) -> &'static str {
        match self {
            SnapshotField::Position => "time-pos",
            SnapshotField::Remaining => "time-remaining",
            other => other.into(),
        }
    }
}

/// A point-in-time view of the player.
/// `None` means the field was excluded from the query; nullable fields use a nested `Option`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_title: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_visibility: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_font_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_ass_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<Vec<PlaylistItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_list: Option<Vec<Chapter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_list: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_chapter: Option<i64>,
}

macro_rules! merge_fields {
    ($target:ident, $newer:ident, $($field:ident),+ $(,)?) => {
        $(
            if $newer.$field.is_some() {
                $target.$field = $newer.$field.clone();
            }
        )+
    };
}

impl PlayerSnapshot {
    /// Overwrites every field present in `newer`, leaving the rest untouched.
    pub fn merge_from(&mut self, newer: &PlayerSnapshot) {
        merge_fields!(
            self,
            newer,
            pause,
            mute,
            filename,
            duration,
            position,
            remaining,
            media_title,
            chapter,
            volume,
            volume_max,
            fullscreen,
            speed,
            sub_delay,
            sub_visibility,
            audio_delay,
            sub_font_size,
            sub_ass_override,
            playlist,
            chapter_list,
            track_list,
            metadata,
            current_chapter,
        );
    }

    /// Title to show for the current file, falling back to its file name.
    pub fn display_title(&self) -> Option<&str> {
        self.media_title
            .as_ref()
            .and_then(|t| t.as_deref())
            .or_else(|| self.filename.as_ref().and_then(|f| f.as_deref()))
    }
}

/// Index of the last chapter starting at or before `position`.
/// Assumes `chapters` is sorted by time, which is how the player reports them.
pub fn current_chapter(chapters: &[Chapter], position: f64) -> i64 {
    chapters
        .iter()
        .rposition(|chapter| chapter.time <= position)
        .map(|i| i as i64)
        .unwrap_or_default()
}
