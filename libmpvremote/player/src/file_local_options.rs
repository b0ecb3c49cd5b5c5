use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Absolute file path to the options applied when that file is loaded.
pub type FileLocalOptionsMap = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Error, Debug)]
pub enum FileLocalOptionsError {
    #[error("Error accessing {0}: {1}")]
    Io(String, io::Error),
    #[error("Invalid options file {0}: {1}")]
    Json(String, serde_json::Error),
}

/// JSON side file read by the player-side script when a file starts.
#[derive(Clone, Debug)]
pub struct FileLocalOptionsStore {
    path: PathBuf,
}

impl FileLocalOptionsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn ensure_exists(&self) -> Result<(), FileLocalOptionsError> {
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_error(e))?
        {
            return Ok(());
        }
        info!("Creating file local options at {:?}", self.path);
        self.write(&FileLocalOptionsMap::new()).await
    }

    pub async fn read(&self) -> Result<FileLocalOptionsMap, FileLocalOptionsError> {
        match tokio::fs::read(&self.path).await {
            Ok(contents) => serde_json::from_slice(&contents).map_err(|e| {
                FileLocalOptionsError::Json(self.path.to_string_lossy().into_owned(), e)
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileLocalOptionsMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    pub async fn write(&self, options: &FileLocalOptionsMap) -> Result<(), FileLocalOptionsError> {
        let contents = serde_json::to_vec(options)
            .map_err(|e| FileLocalOptionsError::Json(self.path.to_string_lossy().into_owned(), e))?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| self.io_error(e))
    }

    /// Replaces the options stored for `file_path`, keeping every other entry.
    pub async fn set(
        &self,
        file_path: impl Into<String>,
        options: BTreeMap<String, Value>,
    ) -> Result<(), FileLocalOptionsError> {
        let file_path = file_path.into();
        let mut all_options = self.read().await?;
        debug!("Storing file local options for {file_path}: {options:?}");
        all_options.insert(file_path, options);
        self.write(&all_options).await
    }

    fn io_error(&self, e: io::Error) -> FileLocalOptionsError {
        FileLocalOptionsError::Io(self.path.to_string_lossy().into_owned(), e)
    }
}

#[cfg(test)]
#[path = "./file_local_options_test.rs"]
mod file_local_options_test;
