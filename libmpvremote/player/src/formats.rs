use std::path::Path;

use serde::Serialize;
use strum::{AsRefStr, Display};

const VIDEO_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "avi", "divx", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "mts",
    "ogv", "rm", "rmvb", "ts", "vob", "webm", "wmv",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "aiff", "alac", "ape", "flac", "m4a", "mka", "mp3", "oga", "ogg", "opus", "wav", "wma",
    "wv",
];

const SUBTITLE_EXTENSIONS: &[&str] = &[
    "ass", "idx", "smi", "srt", "ssa", "sub", "sup", "ttml", "vtt",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    Video,
    Audio,
    Subtitle,
    File,
}

impl FileType {
    pub fn is_playable(&self) -> bool {
        matches!(self, FileType::Video | FileType::Audio)
    }
}

/// Classifies a file by its extension, case-insensitively.
pub fn detect_file_type(path: impl AsRef<Path>) -> FileType {
    let Some(extension) = path
        .as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
    else {
        return FileType::File;
    };

    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        FileType::Video
    } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        FileType::Audio
    } else if SUBTITLE_EXTENSIONS.contains(&extension.as_str()) {
        FileType::Subtitle
    } else {
        FileType::File
    }
}

#[cfg(test)]
#[path = "./formats_test.rs"]
mod formats_test;
