use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::dto::chapter::Chapter;
use crate::dto::player_info::PlayerVersions;
use crate::dto::playlist_item::PlaylistItem;
use crate::dto::snapshot::{
    DEFAULT_SPEED, DEFAULT_SUB_ASS_OVERRIDE, DEFAULT_SUB_FONT_SIZE, DEFAULT_SUB_VISIBILITY,
    DEFAULT_VOLUME_MAX, PlayerSnapshot, SnapshotField, current_chapter,
};
use crate::dto::track::{Track, TrackDetails, TrackType};
use crate::property::PropertyAccessor;

/// Turns `exclude` query values into fields, dropping keys that don't name a field.
pub fn exclusion_set<I, S>(keys: I) -> HashSet<SnapshotField>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            SnapshotField::from_str(key)
                .map_err(|_| debug!("Ignoring unknown exclusion key {key}"))
                .ok()
        })
        .collect()
}

#[derive(Clone)]
pub(crate) struct SnapshotAssembler {
    properties: PropertyAccessor,
}

impl SnapshotAssembler {
    pub(crate) fn new(properties: PropertyAccessor) -> Self {
        Self { properties }
    }

    pub(crate) async fn assemble(&self, exclude: &HashSet<SnapshotField>) -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot::default();
        let props = &self.properties;

        for field in SnapshotField::iter().filter(|f| !exclude.contains(f)) {
            let name = field.property_name();
            match field {
                SnapshotField::Pause => {
                    snapshot.pause = Some(props.get_bool(name).await.unwrap_or(false));
                }
                SnapshotField::Mute => {
                    snapshot.mute = Some(props.get_bool(name).await.unwrap_or(false));
                }
                SnapshotField::Filename => {
                    snapshot.filename = Some(props.get_string(name).await);
                }
                SnapshotField::Duration => {
                    snapshot.duration = Some(props.get_f64(name).await.unwrap_or(0.0));
                }
                SnapshotField::Position => {
                    snapshot.position = Some(props.get_f64(name).await.unwrap_or(0.0));
                }
                SnapshotField::Remaining => {
                    snapshot.remaining = Some(props.get_f64(name).await.unwrap_or(0.0));
                }
                SnapshotField::MediaTitle => {
                    snapshot.media_title = Some(props.get_string(name).await);
                }
                SnapshotField::Chapter => {
                    snapshot.chapter = Some(props.get_i64(name).await.unwrap_or(0));
                }
                SnapshotField::Volume => {
                    snapshot.volume = Some(props.get_i64(name).await.unwrap_or(0));
                }
                SnapshotField::VolumeMax => {
                    snapshot.volume_max =
                        Some(props.get_i64(name).await.unwrap_or(DEFAULT_VOLUME_MAX));
                }
                SnapshotField::Fullscreen => {
                    snapshot.fullscreen = Some(props.get_bool(name).await.unwrap_or(false));
                }
                SnapshotField::Speed => {
                    snapshot.speed = Some(props.get_f64(name).await.unwrap_or(DEFAULT_SPEED));
                }
                SnapshotField::SubDelay => {
                    snapshot.sub_delay = Some(props.get_f64(name).await.unwrap_or(0.0));
                }
                SnapshotField::SubVisibility => {
                    snapshot.sub_visibility =
                        Some(props.get_bool(name).await.unwrap_or(DEFAULT_SUB_VISIBILITY));
                }
                SnapshotField::AudioDelay => {
                    snapshot.audio_delay = Some(props.get_f64(name).await.unwrap_or(0.0));
                }
                SnapshotField::SubFontSize => {
                    snapshot.sub_font_size =
                        Some(props.get_i64(name).await.unwrap_or(DEFAULT_SUB_FONT_SIZE));
                }
                SnapshotField::SubAssOverride => {
                    snapshot.sub_ass_override = Some(
                        props
                            .get_string(name)
                            .await
                            .unwrap_or_else(|| DEFAULT_SUB_ASS_OVERRIDE.to_owned()),
                    );
                }
                SnapshotField::Playlist => snapshot.playlist = Some(self.playlist().await),
                SnapshotField::ChapterList => snapshot.chapter_list = Some(self.chapters().await),
                SnapshotField::TrackList => snapshot.track_list = Some(self.tracks().await),
                SnapshotField::Metadata => snapshot.metadata = Some(self.metadata().await),
                // Derived below, never read from the player
                SnapshotField::CurrentChapter => {}
            }
        }

        if !exclude.contains(&SnapshotField::CurrentChapter) {
            let chapter_index = match (&snapshot.chapter_list, snapshot.position) {
                (Some(chapters), Some(position)) => current_chapter(chapters, position),
                _ => 0,
            };
            snapshot.current_chapter = Some(chapter_index);
        }

        snapshot
    }

    pub(crate) async fn playlist(&self) -> Vec<PlaylistItem> {
        let count = self
            .properties
            .get_i64("playlist-count")
            .await
            .unwrap_or(0);
        let mut items = Vec::new();

        for index in 0..count {
            let Some(id) = self.properties.get_i64(&format!("playlist/{index}/id")).await else {
                continue;
            };
            let file_path = self
                .properties
                .get_string(&format!("playlist/{index}/filename"))
                .await;
            let current = self
                .properties
                .get_bool(&format!("playlist/{index}/current"))
                .await
                .unwrap_or(false);
            let title = self
                .properties
                .get_string(&format!("playlist/{index}/title"))
                .await;

            items.push(PlaylistItem::new(index, id, file_path, current, title));
        }

        items
    }

    pub(crate) async fn tracks(&self) -> Vec<Track> {
        let props = &self.properties;
        let count = props.get_i64("track-list/count").await.unwrap_or(0);
        let mut tracks = Vec::new();

        for index in 0..count {
            let prefix = format!("track-list/{index}");
            let Some(id) = props.get_i64(&format!("{prefix}/id")).await else {
                continue;
            };
            let Some(track_type) = props
                .get_string(&format!("{prefix}/type"))
                .await
                .and_then(|t| TrackType::from_str(&t).ok())
            else {
                continue;
            };
            let selected = props
                .get_bool(&format!("{prefix}/selected"))
                .await
                .unwrap_or(false);
            let codec = props.get_string(&format!("{prefix}/codec")).await;

            let details = match track_type {
                TrackType::Video => TrackDetails::Video {
                    demux_w: props.get_i64(&format!("{prefix}/demux-w")).await,
                    demux_h: props.get_i64(&format!("{prefix}/demux-h")).await,
                },
                TrackType::Audio => TrackDetails::Audio {
                    demux_channel_count: props
                        .get_i64(&format!("{prefix}/demux-channel-count"))
                        .await,
                    demux_channels: props
                        .get_string(&format!("{prefix}/demux-channels"))
                        .await,
                    demux_samplerate: props.get_i64(&format!("{prefix}/demux-samplerate")).await,
                    demux_bitrate: props.get_i64(&format!("{prefix}/demux-bitrate")).await,
                    lang: props.get_string(&format!("{prefix}/lang")).await,
                    external_filename: props
                        .get_string(&format!("{prefix}/external-filename"))
                        .await,
                },
                TrackType::Sub => TrackDetails::Sub {
                    lang: props.get_string(&format!("{prefix}/lang")).await,
                    external_filename: props
                        .get_string(&format!("{prefix}/external-filename"))
                        .await,
                },
            };

            tracks.push(Track {
                index,
                id,
                details,
                selected,
                codec,
            });
        }

        tracks
    }

    pub(crate) async fn chapters(&self) -> Vec<Chapter> {
        let count = self
            .properties
            .get_i64("chapter-list/count")
            .await
            .unwrap_or(0);
        let mut chapters = Vec::new();

        for index in 0..count {
            let Some(time) = self
                .properties
                .get_f64(&format!("chapter-list/{index}/time"))
                .await
            else {
                continue;
            };
            let title = self
                .properties
                .get_string(&format!("chapter-list/{index}/title"))
                .await;
            chapters.push(Chapter { title, time });
        }

        chapters
    }

    /// Tags of the current file. Entries with an empty value are left out.
    pub(crate) async fn metadata(&self) -> BTreeMap<String, String> {
        let props = &self.properties;
        let count = props.get_i64("metadata/list/count").await.unwrap_or(0);
        let mut metadata = BTreeMap::new();

        for index in 0..count {
            let Some(key) = props.get_string(&format!("metadata/list/{index}/key")).await else {
                continue;
            };
            match props.get_string(&format!("metadata/list/{index}/value")).await {
                Some(value) if !value.is_empty() => {
                    metadata.insert(key, value);
                }
                _ => {}
            }
        }

        metadata
    }

    pub(crate) async fn versions(&self) -> PlayerVersions {
        PlayerVersions {
            ffmpeg_version: self.properties.get_string("ffmpeg-version").await,
            mpv_version: self.properties.get_string("mpv-version").await,
            libass_version: self.properties.get_string("libass-version").await,
        }
    }
}

#[cfg(test)]
#[path = "./assembler_test.rs"]
mod assembler_test;
