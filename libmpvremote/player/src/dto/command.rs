use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString, IntoStaticStr};

pub const DEFAULT_LOAD_FLAG: &str = "append-play";
pub const DEFAULT_TRACK_ADD_FLAG: &str = "select";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SeekFlag {
    #[default]
    Relative,
    Absolute,
    AbsolutePercent,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SeekRequest {
    pub target: f64,
    #[serde(default)]
    pub flag: Option<String>,
}

/// Body of a playlist add.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub filename: String,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub seek_to: Option<f64>,
    #[serde(default, rename = "file-local-options")]
    pub file_local_options: Option<BTreeMap<String, Value>>,
}

impl LoadRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            flag: None,
            seek_to: None,
            file_local_options: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrackAddRequest {
    pub filename: String,
    #[serde(default)]
    pub flag: Option<String>,
}
