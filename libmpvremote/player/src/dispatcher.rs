use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

use crate::backend::{PlayerBackend, PlayerError};
use crate::dto::command::{
    DEFAULT_LOAD_FLAG, DEFAULT_TRACK_ADD_FLAG, LoadRequest, SeekFlag, SeekRequest,
    TrackAddRequest,
};
use crate::file_local_options::{FileLocalOptionsError, FileLocalOptionsStore};
use crate::formats::detect_file_type;
use crate::util::is_url;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Player(#[from] PlayerError),
    #[error("{0} does not exist")]
    PathNotFound(String),
    #[error("Error reading {0}: {1}")]
    Io(String, io::Error),
    #[error(transparent)]
    Options(#[from] FileLocalOptionsError),
    #[error("Invalid seek flag: {0}")]
    InvalidSeekFlag(String),
}

/// Translates control requests into player commands and property writes.
#[derive(Clone)]
pub struct CommandDispatcher {
    backend: Arc<dyn PlayerBackend>,
    options: FileLocalOptionsStore,
}

impl CommandDispatcher {
    pub(crate) fn new(backend: Arc<dyn PlayerBackend>, options: FileLocalOptionsStore) -> Self {
        Self { backend, options }
    }

    async fn run(&self, name: &str, args: Vec<Value>) -> Result<(), DispatchError> {
        debug!("Sending command {name} {args:?}");
        self.backend.command(name, args).await?;
        Ok(())
    }

    async fn set(&self, name: &str, value: Value) -> Result<(), DispatchError> {
        debug!("Setting {name} to {value}");
        self.backend.set_property(name, value).await?;
        Ok(())
    }

    pub async fn toggle_pause(&self) -> Result<(), DispatchError> {
        self.run("cycle", vec![json!("pause")]).await
    }

    pub async fn play(&self) -> Result<(), DispatchError> {
        self.set("pause", json!(false)).await
    }

    pub async fn pause(&self) -> Result<(), DispatchError> {
        self.set("pause", json!(true)).await
    }

    pub async fn stop(&self) -> Result<(), DispatchError> {
        self.run("stop", vec![]).await
    }

    pub async fn prev(&self) -> Result<(), DispatchError> {
        self.run("playlist-prev", vec![]).await
    }

    pub async fn next(&self) -> Result<(), DispatchError> {
        self.run("playlist-next", vec![]).await
    }

    pub async fn toggle_fullscreen(&self) -> Result<(), DispatchError> {
        self.run("cycle", vec![json!("fullscreen")]).await
    }

    pub async fn toggle_mute(&self) -> Result<(), DispatchError> {
        self.run("cycle", vec![json!("mute")]).await
    }

    pub async fn set_volume(&self, volume: f64) -> Result<(), DispatchError> {
        self.set("volume", json!(volume)).await
    }

    pub async fn seek(&self, request: SeekRequest) -> Result<(), DispatchError> {
        let flag = match request.flag {
            Some(flag) => {
                SeekFlag::from_str(&flag).map_err(|_| DispatchError::InvalidSeekFlag(flag))?
            }
            None => SeekFlag::default(),
        };
        self.run("seek", vec![json!(request.target), json!(flag.to_string())])
            .await
    }

    pub async fn set_audio_track(&self, id: &str) -> Result<(), DispatchError> {
        self.set("aid", track_id(id)).await
    }

    pub async fn cycle_audio(&self) -> Result<(), DispatchError> {
        self.run("cycle", vec![json!("aid")]).await
    }

    pub async fn add_audio(&self, request: TrackAddRequest) -> Result<(), DispatchError> {
        self.add_track("audio-add", request).await
    }

    pub async fn set_audio_delay(&self, seconds: f64) -> Result<(), DispatchError> {
        self.set("audio-delay", json!(seconds)).await
    }

    pub async fn set_sub_track(&self, id: &str) -> Result<(), DispatchError> {
        self.set("sid", track_id(id)).await
    }

    pub async fn add_sub(&self, request: TrackAddRequest) -> Result<(), DispatchError> {
        self.add_track("sub-add", request).await
    }

    pub async fn set_sub_delay(&self, seconds: f64) -> Result<(), DispatchError> {
        self.set("sub-delay", json!(seconds)).await
    }

    pub async fn set_sub_ass_override(&self, value: &str) -> Result<(), DispatchError> {
        self.set("sub-ass-override", json!(value)).await
    }

    pub async fn set_sub_font_size(&self, size: i64) -> Result<(), DispatchError> {
        self.set("sub-font-size", json!(size)).await
    }

    pub async fn toggle_sub_visibility(&self) -> Result<(), DispatchError> {
        self.run("cycle", vec![json!("sub-visibility")]).await
    }

    pub async fn set_sub_visibility(&self, value: &str) -> Result<(), DispatchError> {
        self.set("sub-visibility", json!(value.eq_ignore_ascii_case("true")))
            .await
    }

    async fn add_track(&self, command: &str, request: TrackAddRequest) -> Result<(), DispatchError> {
        let flag = request
            .flag
            .unwrap_or_else(|| DEFAULT_TRACK_ADD_FLAG.to_owned());
        self.run(command, vec![json!(request.filename), json!(flag)])
            .await
    }

    pub async fn playlist_remove(&self, index: i64) -> Result<(), DispatchError> {
        self.run("playlist-remove", vec![json!(index)]).await
    }

    pub async fn playlist_move(&self, from_index: i64, to_index: i64) -> Result<(), DispatchError> {
        self.run("playlist-move", vec![json!(from_index), json!(to_index)])
            .await
    }

    pub async fn playlist_play_index(&self, index: i64) -> Result<(), DispatchError> {
        self.run("playlist-play-index", vec![json!(index)]).await?;
        self.play().await
    }

    pub async fn playlist_clear(&self) -> Result<(), DispatchError> {
        self.run("playlist-clear", vec![]).await
    }

    pub async fn playlist_shuffle(&self) -> Result<(), DispatchError> {
        self.run("playlist-shuffle", vec![]).await
    }

    /// Adds a file, URL or every playable file of a directory to the playlist.
    pub async fn load(&self, request: LoadRequest) -> Result<(), DispatchError> {
        let LoadRequest {
            filename,
            flag,
            seek_to,
            file_local_options,
        } = request;

        let options_key = if is_url(&filename) {
            filename.clone()
        } else {
            let metadata = match tokio::fs::metadata(&filename).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(DispatchError::PathNotFound(filename));
                }
                Err(e) => return Err(DispatchError::Io(filename, e)),
            };
            if metadata.is_dir() {
                return self.load_directory(&filename).await;
            }
            std::path::absolute(&filename)
                .map_err(|e| DispatchError::Io(filename.clone(), e))?
                .to_string_lossy()
                .into_owned()
        };

        if let Some(options) = file_local_options {
            self.options.set(options_key, options).await?;
        }

        let flag = flag.unwrap_or_else(|| DEFAULT_LOAD_FLAG.to_owned());
        self.run("loadfile", vec![json!(filename), json!(flag)])
            .await?;

        if let Some(seek_to) = seek_to {
            self.run(
                "seek",
                vec![json!(seek_to), json!(SeekFlag::Absolute.to_string())],
            )
            .await?;
        }

        Ok(())
    }

    async fn load_directory(&self, directory: &str) -> Result<(), DispatchError> {
        let io_error = |e: io::Error| DispatchError::Io(directory.to_owned(), e);
        let mut entries = tokio::fs::read_dir(directory).await.map_err(io_error)?;
        let mut loaded = 0;

        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            if !entry.file_type().await.map_err(io_error)?.is_file() {
                continue;
            }
            let path = entry.path();
            if !detect_file_type(&path).is_playable() {
                continue;
            }
            self.run(
                "loadfile",
                vec![json!(path.to_string_lossy()), json!(DEFAULT_LOAD_FLAG)],
            )
            .await?;
            loaded += 1;
        }

        info!("Loaded {loaded} files from {}", Path::new(directory).display());
        Ok(())
    }
}

/// Numeric ids are sent as numbers, anything else (`auto`, `no`) verbatim.
fn track_id(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| json!(id))
}

#[cfg(test)]
#[path = "./dispatcher_test.rs"]
mod dispatcher_test;
